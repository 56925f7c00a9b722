use std::io::{self, Write};

use kanal::AsyncReceiver;
use tokio_util::sync::CancellationToken;
use wordmem_types::{AppEvent, DownloadStatus, NoticeLevel, PageView};

/// Terminal front end: renders app events to stdout.
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = app_to_ui_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => break,
            },
        };

        let mut stdout = io::stdout().lock();
        match event {
            AppEvent::ShowPage(view) => writeln!(stdout, "{}", render_page(&view))?,
            AppEvent::WordbookList { names, selected } => {
                writeln!(stdout, "{}", render_wordbooks(&names, selected.as_deref()))?
            }
            AppEvent::DownloadProgress(status) => {
                write!(stdout, "\r{}", render_progress(&status))?;
                stdout.flush()?;
            }
            AppEvent::PronunciationReady { word, path } => {
                writeln!(stdout, "\u{25b6} {word}: {}", path.display())?
            }
            AppEvent::Notice { level, message } => {
                writeln!(stdout, "{}", render_notice(level, &message))?
            }
            other => {
                tracing::debug!("UI ignoring {:?}", std::mem::discriminant(&other));
            }
        }
    }

    tracing::info!("UI loop stopping");
    Ok(())
}

pub fn render_page(view: &PageView) -> String {
    if view.rows.is_empty() {
        return format!("(no words)    page {}", view.page_label());
    }

    let width = view
        .rows
        .iter()
        .map(|row| row.word.chars().count())
        .max()
        .unwrap_or(0)
        .max("Word".len());

    let mut out = String::new();
    out.push_str(&format!("{:>4}  {:<width$}  Translation\n", "#", "Word"));
    for (i, row) in view.rows.iter().enumerate() {
        let pad = width - row.word.chars().count();
        out.push_str(&format!(
            "{:>4}  {}{}  {}\n",
            i + 1,
            row.word,
            " ".repeat(pad),
            row.translation
        ));
    }

    if view.sampled {
        out.push_str(&format!("random sample of {}", view.rows.len()));
    } else {
        out.push_str(&format!(
            "page {}{}{}",
            view.page_label(),
            if view.has_previous { "  [p]rev" } else { "" },
            if view.has_next { "  [n]ext" } else { "" },
        ));
    }
    out
}

pub fn render_wordbooks(names: &[String], selected: Option<&str>) -> String {
    if names.is_empty() {
        return "No wordbooks found.".to_string();
    }

    names
        .iter()
        .map(|name| {
            let marker = if Some(name.as_str()) == selected { "*" } else { " " };
            format!("{marker} {name}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_progress(status: &DownloadStatus) -> String {
    let kb = status.bytes / 1024;
    match status.fraction() {
        Some(fraction) => format!("Downloading... {:>3.0}% ({kb} KB)", fraction * 100.0),
        None => format!("Downloading... {kb} KB"),
    }
}

pub fn render_notice(level: NoticeLevel, message: &str) -> String {
    match level {
        NoticeLevel::Info => message.to_string(),
        NoticeLevel::Warning => format!("warning: {message}"),
        NoticeLevel::Error => format!("error: {message}"),
    }
}
