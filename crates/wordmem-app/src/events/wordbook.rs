use std::sync::Arc;

use anyhow::Context;
use kanal::AsyncSender;
use wordmem_core::{CoreError, WordbookLoader, library};
use wordmem_types::{AppEvent, NoticeLevel};

use crate::events::{notify, send_page};
use crate::state::AppState;

/// Scan the wordbook directory and report the list with the selection to restore.
pub async fn handle_refresh(
    state: &Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let dir = state.wordbook_directory().await;

    let names = match library::list_wordbooks(&dir) {
        Ok(names) => names,
        Err(CoreError::NotFound { .. }) => {
            notify(
                app_to_ui_tx,
                NoticeLevel::Warning,
                format!(
                    "Wordbook directory {} does not exist. Download a wordbook or pass --dir.",
                    dir.display()
                ),
            )
            .await;
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    let previous = state.settings.lock().await.selected_wordbook();
    let selected = library::pick_selection(&names, previous.as_deref());
    if names.is_empty() {
        tracing::info!("No JSON files found in {}", dir.display());
    }

    app_to_ui_tx
        .send(AppEvent::WordbookList { names, selected })
        .await?;
    Ok(())
}

/// Load `name` from the wordbook directory into the session.
///
/// With `restore_page`, jump to that page after loading instead of the first.
/// Returns the number of loaded words.
pub async fn load_wordbook(
    state: &AppState,
    name: &str,
    restore_page: Option<usize>,
) -> anyhow::Result<usize> {
    let path = library::wordbook_path(&state.wordbook_directory().await, name)?;
    let entries = tokio::task::spawn_blocking(move || WordbookLoader::load(&path))
        .await
        .context("wordbook loader task failed")??;

    let count = entries.len();
    {
        let mut session = state.session.write().await;
        session.browser.set_entries(entries);
        if let Some(page) = restore_page {
            session.browser.go_to_page(page as i64);
        }
        session.wordbook = Some(name.to_string());
    }
    state.save_session().await;
    Ok(count)
}

pub async fn handle_load(
    state: &Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    name: &str,
    restore_page: Option<usize>,
) -> anyhow::Result<()> {
    let name = name.trim();
    if name.is_empty() {
        notify(app_to_ui_tx, NoticeLevel::Warning, "No wordbook selected.").await;
        return Ok(());
    }

    match load_wordbook(state, name, restore_page).await {
        Ok(count) => {
            notify(
                app_to_ui_tx,
                NoticeLevel::Info,
                format!("Loaded wordbook: {name} ({count} words)"),
            )
            .await;
        }
        Err(e) => {
            tracing::error!("Failed to load wordbook {name}: {e:#}");
            clear_session(state).await;
            notify(
                app_to_ui_tx,
                NoticeLevel::Error,
                format!("Failed to load wordbook '{name}': {e:#}"),
            )
            .await;
        }
    }

    send_page(state, app_to_ui_tx).await;
    Ok(())
}

async fn clear_session(state: &AppState) {
    {
        let mut session = state.session.write().await;
        session.browser.set_entries(Vec::new());
        session.wordbook = None;
    }
    state.save_session().await;
}
