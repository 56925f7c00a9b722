//! One-shot subcommands. Each runs a handler against a private ui channel
//! and waits for the renderer to drain it.

use std::future::Future;
use std::sync::Arc;

use kanal::AsyncSender;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use wordmem_types::{AppEvent, NoticeLevel};

use crate::events::download::start_download;
use crate::events::pronounce::start_pronounce;
use crate::events::wordbook::{handle_load, handle_refresh, load_wordbook};
use crate::events::{handle_events, notify, send_page};
use crate::state::AppState;
use crate::ui::ui_loop;

async fn with_ui<F, Fut>(state: Arc<AppState>, f: F) -> anyhow::Result<()>
where
    F: FnOnce(Arc<AppState>, AsyncSender<AppEvent>) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let (tx, rx) = kanal::unbounded_async();
    let ui = tokio::spawn(ui_loop(rx, CancellationToken::new()));

    let result = f(state, tx).await;
    ui.await??;
    result
}

/// Load `book`, or the remembered wordbook when `None`, restoring the saved page.
async fn open_book(
    state: &Arc<AppState>,
    tx: &AsyncSender<AppEvent>,
    book: Option<String>,
) -> anyhow::Result<bool> {
    let (name, restore_page) = match book {
        Some(name) => (Some(name), None),
        None => {
            let settings = state.settings.lock().await;
            (settings.selected_wordbook(), Some(settings.current_page()))
        }
    };

    let Some(name) = name else {
        notify(tx, NoticeLevel::Warning, "No wordbook selected. Use --book NAME or `wordmem list`.").await;
        return Ok(false);
    };

    handle_load_quiet(state, tx, &name, restore_page).await?;
    Ok(state.session.read().await.wordbook.is_some())
}

/// Like [`handle_load`] but without rendering the page.
async fn handle_load_quiet(
    state: &Arc<AppState>,
    tx: &AsyncSender<AppEvent>,
    name: &str,
    restore_page: Option<usize>,
) -> anyhow::Result<()> {
    match load_wordbook(state, name, restore_page).await {
        Ok(count) => {
            tracing::info!("Loaded {count} words from {name}");
            Ok(())
        }
        Err(e) => {
            notify(tx, NoticeLevel::Error, format!("Failed to load wordbook '{name}': {e:#}")).await;
            Ok(())
        }
    }
}

pub async fn list(state: Arc<AppState>) -> anyhow::Result<()> {
    with_ui(state, |state, tx| async move { handle_refresh(&state, &tx).await }).await
}

pub async fn show(
    state: Arc<AppState>,
    book: Option<String>,
    page: Option<i64>,
    per_page: Option<i64>,
    hide: bool,
) -> anyhow::Result<()> {
    with_ui(state, |state, tx| async move {
        if !open_book(&state, &tx, book).await? {
            return Ok(());
        }

        let resized = {
            let mut session = state.session.write().await;
            let resized = match per_page {
                Some(size) => session.browser.set_page_size(size),
                None => Ok(()),
            };
            if resized.is_ok() {
                if let Some(page) = page {
                    session.browser.go_to_page(page);
                }
                session.hidden = hide;
            }
            resized
        };
        if let Err(e) = resized {
            notify(&tx, NoticeLevel::Error, e.to_string()).await;
            return Ok(());
        }

        state.save_session().await;
        send_page(&state, &tx).await;
        Ok(())
    })
    .await
}

pub async fn sample(state: Arc<AppState>, book: Option<String>, count: Option<i64>) -> anyhow::Result<()> {
    with_ui(state, |state, tx| async move {
        if open_book(&state, &tx, book).await? {
            handle_events(&state, &tx, AppEvent::Sample(count)).await?;
        }
        Ok(())
    })
    .await
}

pub async fn download(state: Arc<AppState>, url: Option<String>) -> anyhow::Result<()> {
    with_ui(state, |state, tx| async move {
        let Some(mut handle) = start_download(&state, &tx, url).await else {
            return Ok(());
        };

        tokio::select! {
            result = &mut handle => result?,
            _ = signal::ctrl_c() => {
                tracing::info!("Ctrl+C, cancelling download");
                state.downloads.cancel_all();
                handle.await?;
            }
        }
        println!();
        Ok(())
    })
    .await
}

pub async fn pronounce(state: Arc<AppState>, word: String) -> anyhow::Result<()> {
    with_ui(state, |state, tx| async move {
        if let Some(handle) = start_pronounce(&state, &tx, word).await {
            handle.await?;
        }
        Ok(())
    })
    .await
}

/// Restore the last session before the interactive loop starts.
pub async fn restore_session(
    state: &Arc<AppState>,
    tx: &AsyncSender<AppEvent>,
    book: Option<String>,
) -> anyhow::Result<()> {
    handle_refresh(state, tx).await?;

    let (name, restore_page) = match book {
        Some(name) => (Some(name), None),
        None => {
            let settings = state.settings.lock().await;
            (settings.selected_wordbook(), Some(settings.current_page()))
        }
    };

    match name {
        Some(name) => handle_load(state, tx, &name, restore_page).await,
        None => {
            notify(tx, NoticeLevel::Info, "Type 'books' to list wordbooks and 'load NAME' to start.").await;
            Ok(())
        }
    }
}
