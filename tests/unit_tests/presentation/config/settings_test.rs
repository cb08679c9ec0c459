use call_quality::presentation::Settings;
use call_quality::presentation::config::Environment;

#[test]
fn given_known_names_when_parsing_environment_then_aliases_resolve() {
    assert_eq!("local".parse::<Environment>().unwrap(), Environment::Local);
    assert_eq!("Development".parse::<Environment>().unwrap(), Environment::Local);
    assert_eq!(" TEST ".parse::<Environment>().unwrap(), Environment::Test);
    assert_eq!("production".parse::<Environment>().unwrap(), Environment::Prod);
}

#[test]
fn given_unknown_name_when_parsing_environment_then_error_names_it() {
    let error = "staging".parse::<Environment>().unwrap_err();
    assert!(error.to_string().contains("staging"));
}

#[test]
fn given_environment_when_resolving_settings_file_then_uses_lowercase_stem() {
    assert_eq!(Environment::Prod.settings_file(), "appsettings.prod");
    assert_eq!(Environment::default().settings_file(), "appsettings.local");
}

#[test]
fn given_no_settings_file_when_loading_then_defaults_apply() {
    let settings = Settings::load(Environment::Test).unwrap();

    assert_eq!(settings.transcription.model, "whisper-large-v3");
    assert_eq!(settings.transcription.language, "ru");
    assert_eq!(settings.storage.max_file_size_mb, 25);
    assert_eq!(settings.storage.max_file_size_bytes(), 25 * 1024 * 1024);
    assert!(settings.analysis.require_full_coverage);
    assert!(!settings.logging.enable_json);
}
