use std::sync::Arc;

use bytes::Bytes;

use call_quality::application::ports::{AudioFetcher, CallRepository};
use call_quality::application::services::{AudioUpload, CallIntakeService, IntakeError};
use call_quality::domain::{AnalysisStatus, UserId};
use call_quality::infrastructure::persistence::InMemoryRepository;
use call_quality::infrastructure::storage::{LocalAudioStore, UriAudioFetcher};

const LIMIT: usize = 1024;

struct Fixture {
    _dir: tempfile::TempDir,
    store: Arc<LocalAudioStore>,
    repository: Arc<InMemoryRepository>,
    service: CallIntakeService,
}

fn fixture() -> Fixture {
    let dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(LocalAudioStore::new(dir.path().to_path_buf()).unwrap());
    let repository = Arc::new(InMemoryRepository::new());
    let service = CallIntakeService::new(store.clone(), repository.clone(), LIMIT);
    Fixture {
        _dir: dir,
        store,
        repository,
        service,
    }
}

fn upload(filename: &str, content_type: Option<&str>, data: &'static [u8]) -> AudioUpload {
    AudioUpload {
        filename: filename.to_string(),
        content_type: content_type.map(String::from),
        data: Bytes::from_static(data),
        manager_id: UserId::new(),
        client_id: None,
    }
}

#[tokio::test]
async fn given_mp3_upload_when_accepting_then_pending_call_points_at_stored_audio() {
    let f = fixture();

    let call = f
        .service
        .accept(upload("call.mp3", Some("audio/mpeg"), b"ID3-audio"))
        .await
        .unwrap();

    assert_eq!(call.status, AnalysisStatus::Pending);
    assert!(call.audio_url.starts_with("local://"));
    assert!(call.audio_url.ends_with("-call.mp3"));
    assert!(call.audio_url.contains(&call.manager_id.to_string()));

    let stored = f.repository.get_by_id(call.id).await.unwrap();
    assert!(stored.is_some());

    let fetcher = UriAudioFetcher::new(f.store.clone(), std::time::Duration::from_secs(5)).unwrap();
    assert_eq!(fetcher.fetch(&call.audio_url).await.unwrap(), b"ID3-audio");
}

#[tokio::test]
async fn given_unknown_mime_with_known_extension_when_accepting_then_uses_extension() {
    let f = fixture();

    let call = f
        .service
        .accept(upload(
            "recording.ogg",
            Some("application/octet-stream"),
            b"OggS",
        ))
        .await
        .unwrap();

    assert!(call.audio_url.ends_with("recording.ogg"));
}

#[tokio::test]
async fn given_known_mime_without_extension_when_accepting_then_appends_extension() {
    let f = fixture();

    let call = f
        .service
        .accept(upload("voice-note", Some("audio/webm"), b"webm"))
        .await
        .unwrap();

    assert!(call.audio_url.ends_with("voice-note.webm"));
}

#[tokio::test]
async fn given_unsupported_format_when_accepting_then_rejects_without_storing() {
    let f = fixture();

    let result = f
        .service
        .accept(upload("slides.pdf", Some("application/pdf"), b"%PDF"))
        .await;

    assert!(matches!(result, Err(IntakeError::UnsupportedFormat(_))));
    assert!(f.repository.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn given_empty_file_when_accepting_then_rejects() {
    let f = fixture();

    let result = f.service.accept(upload("call.wav", None, b"")).await;

    assert!(matches!(result, Err(IntakeError::EmptyFile)));
}

#[tokio::test]
async fn given_file_over_limit_when_accepting_then_rejects_with_sizes() {
    let f = fixture();
    static BIG: [u8; LIMIT + 1] = [0u8; LIMIT + 1];

    let result = f.service.accept(upload("call.m4a", None, &BIG)).await;

    assert!(matches!(
        result,
        Err(IntakeError::TooLarge {
            size,
            limit: LIMIT
        }) if size == LIMIT + 1
    ));
    assert!(f.repository.list(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn given_two_managers_when_listing_by_manager_then_only_their_calls_return() {
    let f = fixture();
    let manager = UserId::new();
    let mut mine = upload("a.mp3", None, b"a");
    mine.manager_id = manager;

    f.service.accept(mine).await.unwrap();
    f.service.accept(upload("b.mp3", None, b"b")).await.unwrap();

    let filtered = f.repository.list(Some(manager)).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].manager_id, manager);
    assert_eq!(f.repository.list(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn given_filename_with_hash_when_accepting_then_stored_name_keeps_single_extension() {
    let f = fixture();

    let call = f
        .service
        .accept(upload("memo#2.webm", None, b"webm-bytes"))
        .await
        .unwrap();

    assert!(call.audio_url.ends_with("-memo_2.webm"));
    assert!(!call.audio_url.contains('#'));
    assert_eq!(
        call_quality::domain::AudioFormat::from_filename(&call.audio_url),
        Some(call_quality::domain::AudioFormat::Webm)
    );
}
