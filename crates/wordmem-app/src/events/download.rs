use std::sync::Arc;

use kanal::AsyncSender;
use tokio::task::JoinHandle;
use wordmem_net::{NetError, wordbook_destination};
use wordmem_types::{AppEvent, NoticeLevel};

use crate::events::notify;
use crate::events::wordbook::handle_refresh;
use crate::state::AppState;

/// Start downloading a wordbook into the wordbook directory.
///
/// Returns `None` when the download could not be started (bad URL, the
/// directory is unusable, or the same file is already being downloaded).
pub async fn start_download(
    state: &Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    url: Option<String>,
) -> Option<JoinHandle<()>> {
    let url = match url {
        Some(url) => url,
        None => state.config.read().await.network.download_url.clone(),
    };
    let dir = state.wordbook_directory().await;

    let dest = match wordbook_destination(&url, &dir).await {
        Ok(dest) => dest,
        Err(e) => {
            tracing::error!("Cannot download {url}: {e}");
            notify(app_to_ui_tx, NoticeLevel::Error, format!("Cannot download wordbook: {e}")).await;
            return None;
        }
    };

    let guard = match state.downloads.begin(dest.clone()) {
        Ok(guard) => guard,
        Err(e) => {
            notify(
                app_to_ui_tx,
                NoticeLevel::Warning,
                format!("{} is already downloading ({e}).", dest.display()),
            )
            .await;
            return None;
        }
    };

    let tasks = state.tasks.clone();
    let state = Arc::clone(state);
    let tx = app_to_ui_tx.clone();

    Some(tasks.spawn(async move {
        let progress_tx = tx.clone();
        let result = state
            .downloader
            .download_to_file(&url, &dest, guard.token(), move |status| {
                // progress is best effort, a full channel just skips an update
                let _ = progress_tx.try_send(AppEvent::DownloadProgress(status));
            })
            .await;
        drop(guard);

        match result {
            Ok(bytes) => {
                notify(
                    &tx,
                    NoticeLevel::Info,
                    format!("Wordbook saved to {} ({bytes} bytes)", dest.display()),
                )
                .await;
                if let Err(e) = handle_refresh(&state, &tx).await {
                    tracing::error!("Failed to refresh wordbooks after download: {e}");
                }
            }
            Err(NetError::Cancelled) => {
                tracing::info!("Download cancelled: {url}");
                notify(&tx, NoticeLevel::Warning, "Download cancelled.").await;
            }
            Err(e) => {
                tracing::error!("Download of {url} failed: {e}");
                notify(
                    &tx,
                    NoticeLevel::Error,
                    format!("Failed to download wordbook from {url}: {e}"),
                )
                .await;
            }
        }
    }))
}

pub async fn handle_cancel_download(state: &AppState, app_to_ui_tx: &AsyncSender<AppEvent>) {
    let cancelled = state.downloads.cancel_all();
    if cancelled == 0 {
        notify(app_to_ui_tx, NoticeLevel::Info, "No download in progress.").await;
    }
}
