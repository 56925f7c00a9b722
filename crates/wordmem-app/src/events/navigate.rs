use std::sync::Arc;

use kanal::AsyncSender;
use wordmem_core::view;
use wordmem_types::{AppEvent, NoticeLevel};

use crate::events::{notify, send_page};
use crate::state::AppState;

/// Page movement, page size, sampling and translation masking.
pub async fn handle_navigation(
    state: &Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::NextPage => {
            state.session.write().await.browser.next_page();
        }
        AppEvent::PreviousPage => {
            state.session.write().await.browser.previous_page();
        }
        AppEvent::GoToPage(page) => {
            state.session.write().await.browser.go_to_page(page);
        }
        AppEvent::SetPageSize(size) => {
            let max = state.config.read().await.ui.max_words_per_page as i64;
            if size > max {
                notify(
                    app_to_ui_tx,
                    NoticeLevel::Warning,
                    format!("Words per page must be between 1 and {max}."),
                )
                .await;
                return Ok(());
            }
            let result = state.session.write().await.browser.set_page_size(size);
            if let Err(e) = result {
                notify(app_to_ui_tx, NoticeLevel::Warning, e.to_string()).await;
                return Ok(());
            }
        }
        AppEvent::HideTranslations(hidden) => {
            state.session.write().await.hidden = hidden;
        }
        AppEvent::ShowCurrentPage => {}
        AppEvent::Sample(count) => return send_sample(state, app_to_ui_tx, count).await,
        AppEvent::Reveal(word) => return reveal(state, app_to_ui_tx, &word).await,
        other => {
            tracing::warn!("Not a navigation event: {:?}", std::mem::discriminant(&other));
            return Ok(());
        }
    }

    state.save_session().await;
    send_page(state, app_to_ui_tx).await;
    Ok(())
}

async fn send_sample(
    state: &AppState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    count: Option<i64>,
) -> anyhow::Result<()> {
    let mask = state.config.read().await.ui.translation_mask.clone();
    let view = {
        let session = state.session.read().await;
        if session.browser.is_empty() {
            None
        } else {
            let count = count.unwrap_or(session.browser.page_size() as i64);
            let sample = session.browser.sample(count);
            Some(view::sample_view(&session.browser, &sample, session.hidden, &mask))
        }
    };

    match view {
        Some(view) => app_to_ui_tx.send(AppEvent::ShowPage(view)).await?,
        None => notify(app_to_ui_tx, NoticeLevel::Warning, "No wordbook loaded.").await,
    }
    Ok(())
}

async fn reveal(state: &AppState, app_to_ui_tx: &AsyncSender<AppEvent>, word: &str) -> anyhow::Result<()> {
    let word = word.trim();
    let found = {
        let session = state.session.read().await;
        session
            .browser
            .entries()
            .iter()
            .find(|entry| entry.word().eq_ignore_ascii_case(word))
            .map(|entry| format!("{}: {}", entry.word(), entry.translation()))
    };

    match found {
        Some(text) => notify(app_to_ui_tx, NoticeLevel::Info, text).await,
        None => {
            notify(
                app_to_ui_tx,
                NoticeLevel::Warning,
                format!("'{word}' is not in the loaded wordbook."),
            )
            .await
        }
    }
    Ok(())
}
