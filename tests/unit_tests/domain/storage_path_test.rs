use chrono::{TimeZone, Utc};

use call_quality::domain::{StoragePath, UserId};

#[test]
fn given_manager_and_filename_when_creating_path_then_format_is_uuid_slash_millis_dash_filename() {
    let manager_id = UserId::new();
    let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

    let path = StoragePath::for_upload(&manager_id, at, "call.mp3");

    let expected = format!("{}/1700000000123-call.mp3", manager_id.as_uuid());
    assert_eq!(path.as_str(), expected);
}

#[test]
fn given_filename_with_separators_when_creating_path_then_they_are_neutralized() {
    let manager_id = UserId::new();

    let path = StoragePath::for_upload(&manager_id, Utc::now(), "../etc\\passwd.wav");

    assert_eq!(path.as_str().matches('/').count(), 1);
    assert!(path.as_str().ends_with("-.._etc_passwd.wav"));
}

#[test]
fn given_two_different_managers_when_creating_paths_then_paths_differ() {
    let at = Utc::now();

    let path_a = StoragePath::for_upload(&UserId::new(), at, "file.ogg");
    let path_b = StoragePath::for_upload(&UserId::new(), at, "file.ogg");

    assert_ne!(path_a, path_b);
}

#[test]
fn given_storage_path_when_displayed_then_matches_as_str() {
    let path = StoragePath::from_raw("manager/1-test.wav");

    assert_eq!(format!("{}", path), path.as_str());
}

#[test]
fn given_filename_with_query_or_fragment_chars_when_creating_path_then_extension_survives() {
    let manager_id = UserId::new();
    let at = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

    let path = StoragePath::for_upload(&manager_id, at, "memo#2?v=1.webm");

    assert!(path.as_str().ends_with("/1700000000000-memo_2_v=1.webm"));
    assert_eq!(StoragePath::sanitize_filename("memo#2.webm"), "memo_2.webm");
}
