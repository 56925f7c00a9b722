//! Background pronunciation fetches and duplicate suppression

use std::sync::Arc;

use kanal::unbounded_async;
use tokio::sync::Notify;
use wordmem_types::{AppEvent, NoticeLevel};

use super::{FakePronouncer, Fixture, next_event};
use crate::events::pronounce::start_pronounce;

#[tokio::test]
async fn test_pronounce_saves_audio() {
    let fixture = Fixture::new();
    let (tx, rx) = unbounded_async();

    let handle = start_pronounce(&fixture.state, &tx, "  Abandon ".into())
        .await
        .unwrap();
    handle.await.unwrap();

    match next_event(&rx).await {
        AppEvent::PronunciationReady { word, path } => {
            assert_eq!(word, "Abandon");
            assert!(path.starts_with(fixture.dir.path().join("audio")));
            assert_eq!(std::fs::read(&path).unwrap(), b"ID3fake");
        }
        other => panic!("expected pronunciation, got {other:?}"),
    }
    assert!(fixture.state.pronunciations.is_empty());
}

#[tokio::test]
async fn test_blank_word_is_ignored() {
    let fixture = Fixture::new();
    let (tx, rx) = unbounded_async();

    assert!(start_pronounce(&fixture.state, &tx, "   ".into()).await.is_none());
    assert!(rx.is_empty());
}

#[tokio::test]
async fn test_duplicate_request_is_rejected_while_running() {
    let gate = Arc::new(Notify::new());
    let fixture = Fixture::with_pronouncer(Arc::new(FakePronouncer::gated(gate.clone())));
    let (tx, rx) = unbounded_async();

    let first = start_pronounce(&fixture.state, &tx, "abandon".into())
        .await
        .unwrap();
    assert!(
        start_pronounce(&fixture.state, &tx, "ABANDON".into())
            .await
            .is_none()
    );
    match next_event(&rx).await {
        AppEvent::Notice { level, message } => {
            assert_eq!(level, NoticeLevel::Info);
            assert!(message.contains("already"), "{message}");
        }
        other => panic!("expected notice, got {other:?}"),
    }

    gate.notify_one();
    first.await.unwrap();
    assert!(matches!(
        next_event(&rx).await,
        AppEvent::PronunciationReady { .. }
    ));

    // finished fetches can be repeated
    gate.notify_one();
    let again = start_pronounce(&fixture.state, &tx, "abandon".into())
        .await
        .unwrap();
    again.await.unwrap();
}

#[tokio::test]
async fn test_cancelled_fetch_reports_nothing() {
    let gate = Arc::new(Notify::new());
    let fixture = Fixture::with_pronouncer(Arc::new(FakePronouncer::gated(gate)));
    let (tx, rx) = unbounded_async();

    let handle = start_pronounce(&fixture.state, &tx, "abandon".into())
        .await
        .unwrap();
    assert_eq!(fixture.state.pronunciations.cancel_all(), 1);
    handle.await.unwrap();

    assert!(rx.is_empty());
    assert!(fixture.state.pronunciations.is_empty());
}

#[tokio::test]
async fn test_words_sharing_a_file_share_a_fetch() {
    let gate = Arc::new(Notify::new());
    let fixture = Fixture::with_pronouncer(Arc::new(FakePronouncer::gated(gate.clone())));
    let (tx, rx) = unbounded_async();

    let first = start_pronounce(&fixture.state, &tx, "ice cream".into())
        .await
        .unwrap();
    assert!(
        start_pronounce(&fixture.state, &tx, "Ice_Cream".into())
            .await
            .is_none()
    );
    assert!(matches!(
        next_event(&rx).await,
        AppEvent::Notice { level: NoticeLevel::Info, .. }
    ));

    gate.notify_one();
    first.await.unwrap();
    match next_event(&rx).await {
        AppEvent::PronunciationReady { path, .. } => {
            assert_eq!(path, fixture.dir.path().join("audio").join("ice_cream.mp3"));
        }
        other => panic!("expected pronunciation, got {other:?}"),
    }
}
