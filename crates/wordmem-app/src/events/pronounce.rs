use std::sync::Arc;

use kanal::AsyncSender;
use tokio::task::JoinHandle;
use wordmem_net::audio_file_stem;
use wordmem_types::{AppEvent, NoticeLevel};

use crate::audio;
use crate::events::notify;
use crate::state::AppState;

/// Fetch pronunciation audio for `word` in the background, cache it and
/// play it when playback is available and enabled.
///
/// Returns `None` if the word is blank or a fetch for it is already running.
pub async fn start_pronounce(
    state: &Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    word: String,
) -> Option<JoinHandle<()>> {
    let word = word.trim().to_string();
    if word.is_empty() {
        tracing::warn!("Attempted to pronounce an empty word.");
        return None;
    }

    let guard = match state.pronunciations.begin(audio_file_stem(&word)) {
        Ok(guard) => guard,
        Err(_) => {
            notify(
                app_to_ui_tx,
                NoticeLevel::Info,
                format!("Pronunciation for '{word}' is already being fetched."),
            )
            .await;
            return None;
        }
    };

    let tasks = state.tasks.clone();
    let state = Arc::clone(state);
    let tx = app_to_ui_tx.clone();

    Some(tasks.spawn(async move {
        let cache_dir = state.audio_cache_dir().await;
        let play = audio::PLAYBACK_ENABLED && state.config.read().await.ui.play_audio;
        let provider = state.pronouncer.metadata();
        tracing::debug!("Fetching '{word}' from {} ({})", provider.name, provider.base_url);
        let result = tokio::select! {
            _ = guard.token().cancelled() => return,
            result = state.pronouncer.pronounce(&word) => result,
        };

        let saved = match result {
            Ok(pronunciation) => pronunciation.save_to(&cache_dir).await,
            Err(e) => Err(e),
        };

        match saved {
            Ok(path) => {
                tracing::info!("Pronunciation for '{word}' saved to {}", path.display());
                let ready = AppEvent::PronunciationReady {
                    word: word.clone(),
                    path: path.clone(),
                };
                if let Err(e) = tx.send(ready).await {
                    tracing::error!("Failed to send pronunciation to ui: {e}");
                }

                if play && let Err(e) = audio::play_file(path).await {
                    tracing::warn!("Could not play pronunciation for '{word}': {e:#}");
                    notify(
                        &tx,
                        NoticeLevel::Warning,
                        format!("Could not play pronunciation for '{word}': {e:#}"),
                    )
                    .await;
                }
            }
            Err(e) => {
                tracing::error!("Error during TTS request for word '{word}': {e}");
                notify(
                    &tx,
                    NoticeLevel::Error,
                    format!("Error requesting pronunciation for '{word}': {e}"),
                )
                .await;
            }
        }
    }))
}
