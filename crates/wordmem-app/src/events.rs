use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use wordmem_types::{AppEvent, NoticeLevel};

use crate::state::AppState;

/// How long background tasks get to clean up after cancellation
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub mod download;
pub mod navigate;
pub mod pronounce;
pub mod wordbook;

use download::{handle_cancel_download, start_download};
use navigate::handle_navigation;
use pronounce::start_pronounce;
use wordbook::{handle_load, handle_refresh};

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => {
                    tracing::info!("[EVENT_LOOP] Input closed");
                    break;
                }
            },
        };

        if matches!(event, AppEvent::Quit) {
            tracing::info!("[EVENT_LOOP] Quit requested");
            cancel.cancel();
            break;
        }

        tracing::debug!("[EVENT_LOOP] EVENT RECEIVED: {:?}", std::mem::discriminant(&event));
        if let Err(e) = handle_events(&state, &app_to_ui_tx, event).await {
            tracing::error!("Event handler failed: {e:#}");
            notify(&app_to_ui_tx, NoticeLevel::Error, format!("{e:#}")).await;
        }
    }

    state.downloads.cancel_all();
    state.pronunciations.cancel_all();
    state.tasks.close();
    if tokio::time::timeout(SHUTDOWN_GRACE, state.tasks.wait()).await.is_err() {
        tracing::warn!("{} background tasks still running at shutdown", state.tasks.len());
    }
    state.save_session().await;
    Ok(())
}

pub async fn handle_events(
    state: &Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::RefreshWordbooks => handle_refresh(state, app_to_ui_tx).await?,
        AppEvent::LoadWordbook(name) => handle_load(state, app_to_ui_tx, &name, None).await?,
        AppEvent::DownloadWordbook { url } => {
            // runs in the background, completion is reported through app_to_ui_tx
            let _ = start_download(state, app_to_ui_tx, url).await;
        }
        AppEvent::CancelDownload => handle_cancel_download(state, app_to_ui_tx).await,
        AppEvent::Pronounce(word) => {
            let _ = start_pronounce(state, app_to_ui_tx, word).await;
        }
        AppEvent::NextPage
        | AppEvent::PreviousPage
        | AppEvent::GoToPage(_)
        | AppEvent::SetPageSize(_)
        | AppEvent::Sample(_)
        | AppEvent::ShowCurrentPage
        | AppEvent::HideTranslations(_)
        | AppEvent::Reveal(_) => handle_navigation(state, app_to_ui_tx, event).await?,
        AppEvent::Quit => {}
        // UI-only events, ignore in backend
        AppEvent::ShowPage(_)
        | AppEvent::WordbookList { .. }
        | AppEvent::DownloadProgress(_)
        | AppEvent::PronunciationReady { .. }
        | AppEvent::Notice { .. } => {}
    }

    Ok(())
}

pub async fn notify(tx: &AsyncSender<AppEvent>, level: NoticeLevel, message: impl Into<String>) {
    let message = message.into();
    if let Err(e) = tx.send(AppEvent::Notice { level, message }).await {
        tracing::error!("Failed to send notice to ui: {e}");
    }
}

pub async fn send_page(state: &AppState, tx: &AsyncSender<AppEvent>) {
    let view = state.page_view().await;
    if let Err(e) = tx.send(AppEvent::ShowPage(view)).await {
        tracing::error!("Failed to send page to ui: {e}");
    }
}
