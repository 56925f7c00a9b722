use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::{Mutex, RwLock};
use tokio_util::task::TaskTracker;
use wordmem_config::{Config, SettingsStore};
use wordmem_core::WordBrowser;
use wordmem_core::view;
use wordmem_net::{Downloader, Pronouncer, SingleFlight, YoudaoPronouncer};
use wordmem_types::PageView;

/// What the user is currently looking at
pub struct Session {
    pub browser: WordBrowser,
    pub hidden: bool,
    pub wordbook: Option<String>,
}

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub settings: Mutex<SettingsStore>,
    pub session: RwLock<Session>,
    /// Running downloads, keyed by destination file
    pub downloads: SingleFlight<PathBuf>,
    /// Running pronunciation fetches, keyed by audio file stem
    pub pronunciations: SingleFlight<String>,
    pub downloader: Downloader,
    pub pronouncer: Arc<dyn Pronouncer>,
    /// Background downloads and fetches, drained before shutdown
    pub tasks: TaskTracker,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let settings = SettingsStore::open(
            &config.settings_path,
            &config.wordbook.directory,
            config.ui.default_words_per_page,
        )
        .context("failed to open settings")?;
        let downloader =
            Downloader::new(&config.network).context("failed to build download client")?;
        let pronouncer =
            YoudaoPronouncer::new(&config.network).context("failed to build TTS client")?;

        Ok(Self::with_parts(
            config,
            settings,
            downloader,
            Arc::new(pronouncer),
        ))
    }

    pub fn with_parts(
        config: Config,
        settings: SettingsStore,
        downloader: Downloader,
        pronouncer: Arc<dyn Pronouncer>,
    ) -> Self {
        let session = Session {
            browser: WordBrowser::new(settings.words_per_page()),
            hidden: config.ui.hide_translations,
            wordbook: None,
        };

        Self {
            config: Arc::new(RwLock::new(config)),
            settings: Mutex::new(settings),
            session: RwLock::new(session),
            downloads: SingleFlight::new(),
            pronunciations: SingleFlight::new(),
            downloader,
            pronouncer,
            tasks: TaskTracker::new(),
        }
    }

    pub async fn wordbook_directory(&self) -> PathBuf {
        self.settings.lock().await.wordbook_directory()
    }

    pub async fn audio_cache_dir(&self) -> PathBuf {
        let config = self.config.read().await;
        match &config.wordbook.audio_cache_dir {
            Some(dir) => dir.clone(),
            None => self.wordbook_directory().await.join(".audio"),
        }
    }

    pub async fn page_view(&self) -> PageView {
        let mask = self.config.read().await.ui.translation_mask.clone();
        let session = self.session.read().await;
        view::page_view(&session.browser, session.hidden, &mask)
    }

    /// Write page, page size and selected wordbook to the settings file.
    pub async fn save_session(&self) {
        let (page, page_size, wordbook) = {
            let session = self.session.read().await;
            (
                session.browser.current_page(),
                session.browser.page_size(),
                session.wordbook.clone(),
            )
        };

        let mut settings = self.settings.lock().await;
        settings.set_current_page(page);
        settings.set_words_per_page(page_size);
        settings.set_selected_wordbook(wordbook.as_deref());
        if let Err(e) = settings.save() {
            tracing::error!("Failed to save settings: {e}");
        }
    }
}
