use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use wordmem_config::Config;

pub mod audio;
pub mod commands;
pub mod controller;
pub mod events;
pub mod io;
pub mod state;
pub mod ui;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::state::AppState;

/// Memorize vocabulary from JSON wordbooks
#[derive(Parser, Debug)]
#[command(name = "wordmem", version, about)]
struct Cli {
    /// JSON config file (defaults come from WORDMEM_* environment variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Use and remember this wordbook directory
    #[arg(long, global = true)]
    dir: Option<PathBuf>,
    /// Fetch pronunciations without playing them
    #[arg(long, global = true, default_value = "false")]
    mute: bool,
    /// Emit logs as JSON
    #[arg(long, global = true, default_value = "false")]
    log_json: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List wordbooks in the wordbook directory
    List,
    /// Print one page of a wordbook
    Show {
        #[arg(short, long)]
        book: Option<String>,
        #[arg(short, long, allow_negative_numbers = true)]
        page: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        per_page: Option<i64>,
        /// Mask translations
        #[arg(long, default_value = "false")]
        hide: bool,
    },
    /// Print a random sample of a wordbook
    Sample {
        #[arg(short, long)]
        book: Option<String>,
        #[arg(short, long, allow_negative_numbers = true)]
        count: Option<i64>,
    },
    /// Download a wordbook into the wordbook directory
    Download {
        #[arg(long)]
        url: Option<String>,
    },
    /// Fetch and cache the pronunciation of a word
    Pronounce { word: String },
    /// Interactive study session (default)
    Study {
        #[arg(short, long)]
        book: Option<String>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.with_ansi(atty::is(atty::Stream::Stderr)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::new(),
    };
    if cli.mute {
        config.ui.play_audio = false;
    }
    let state = Arc::new(AppState::new(config)?);

    if let Some(dir) = &cli.dir {
        let mut settings = state.settings.lock().await;
        settings.set_wordbook_directory(dir);
        settings.save().context("failed to save wordbook directory")?;
    }

    let command = cli.command.unwrap_or(Command::Study { book: None });
    match command {
        Command::List => commands::list(state.clone()).await,
        Command::Show {
            book,
            page,
            per_page,
            hide,
        } => commands::show(state.clone(), book, page, per_page, hide).await,
        Command::Sample { book, count } => commands::sample(state.clone(), book, count).await,
        Command::Download { url } => commands::download(state.clone(), url).await,
        Command::Pronounce { word } => commands::pronounce(state.clone(), word).await,
        Command::Study { book } => study(state.clone(), book).await,
    }
}

async fn study(state: Arc<AppState>, book: Option<String>) -> anyhow::Result<()> {
    let controller = AppController::new(state.clone());
    let mut tasks = controller.spawn_tasks();

    commands::restore_session(&state, &controller.app_to_ui(), book).await?;
    controller.spawn_input();

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("Shutdown requested");
        }
        Some(result) = tasks.join_next() => {
            match result {
                Ok(Ok(())) => tracing::info!("task exited"),
                Ok(Err(e)) => tracing::error!("task failed: {e:#}"),
                Err(e) => tracing::error!("task panicked: {e}"),
            }
        }
    }

    controller.shutdown();
    while let Some(result) = tasks.join_next().await {
        if let Ok(Err(e)) = result {
            tracing::error!("task failed during shutdown: {e:#}");
        }
    }

    Ok(())
}
