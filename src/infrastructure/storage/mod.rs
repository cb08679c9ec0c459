mod local_store;
mod uri_audio_fetcher;

pub use local_store::LocalAudioStore;
pub use uri_audio_fetcher::UriAudioFetcher;
