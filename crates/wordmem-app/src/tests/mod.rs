use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kanal::AsyncReceiver;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::time::timeout;
use wordmem_config::{Config, SettingsStore};
use wordmem_net::{Downloader, NetError, Pronouncer, Pronunciation, ProviderMetadata};
use wordmem_types::{AppEvent, PageView};

use crate::state::AppState;

mod pronounce_tests;

/// Pronouncer that answers from memory, optionally waiting on a gate first.
pub struct FakePronouncer {
    gate: Option<Arc<Notify>>,
}

impl FakePronouncer {
    pub fn new() -> Self {
        Self { gate: None }
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self { gate: Some(gate) }
    }
}

#[async_trait]
impl Pronouncer for FakePronouncer {
    async fn pronounce(&self, word: &str) -> Result<Pronunciation, NetError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(Pronunciation {
            word: word.to_string(),
            content_type: "audio/mpeg".to_string(),
            audio: b"ID3fake".to_vec(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "fake".to_string(),
            base_url: "memory://".to_string(),
        }
    }
}

pub struct Fixture {
    pub dir: TempDir,
    pub state: Arc<AppState>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_pronouncer(Arc::new(FakePronouncer::new()))
    }

    pub fn with_pronouncer(pronouncer: Arc<dyn Pronouncer>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new();
        config.wordbook.directory = dir.path().join("books");
        config.wordbook.audio_cache_dir = Some(dir.path().join("audio"));
        config.settings_path = dir.path().join("settings.json");
        config.ui.default_words_per_page = 50;
        config.ui.hide_translations = false;
        config.ui.play_audio = false;

        let settings = SettingsStore::open(
            &config.settings_path,
            &config.wordbook.directory,
            config.ui.default_words_per_page,
        )
        .unwrap();
        let downloader = Downloader::new(&config.network).unwrap();
        let state = Arc::new(AppState::with_parts(config, settings, downloader, pronouncer));

        Self { dir, state }
    }

    pub fn books(&self) -> std::path::PathBuf {
        self.dir.path().join("books")
    }

    /// Write a wordbook with `count` words named `word000`, `word001`, ...
    pub fn write_book(&self, name: &str, count: usize) {
        let records: Vec<String> = (0..count)
            .map(|i| {
                format!(
                    r#"{{"word": "word{i:03}", "translations": [{{"type": "n", "translation": "meaning {i}"}}]}}"#
                )
            })
            .collect();
        write_file(&self.books().join(name), &format!("[{}]", records.join(",")));
    }

    pub fn reopen_settings(&self) -> SettingsStore {
        SettingsStore::open(self.dir.path().join("settings.json"), self.books(), 50).unwrap()
    }
}

pub fn write_file(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

pub async fn next_event(rx: &AsyncReceiver<AppEvent>) -> AppEvent {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for ui event")
        .expect("ui channel closed")
}

/// Skip notices and other events until a page arrives.
pub async fn next_page(rx: &AsyncReceiver<AppEvent>) -> PageView {
    loop {
        if let AppEvent::ShowPage(view) = next_event(rx).await {
            return view;
        }
    }
}

/// Serve one request: headers announcing a larger body, `sent` bytes of it,
/// then hold the connection open without sending more.
pub async fn stalling_server(sent: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 1024];
        let _ = socket.read(&mut request).await;

        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
            sent * 4
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&vec![b' '; sent]).await.unwrap();
        socket.flush().await.unwrap();
        std::future::pending::<()>().await;
    });

    format!("http://{addr}/book.json")
}
