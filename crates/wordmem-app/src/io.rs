use std::io::{self, BufRead};
use std::str::FromStr;
use std::thread;

use kanal::{AsyncSender, Sender};
use tokio_util::sync::CancellationToken;
use wordmem_types::AppEvent;

/// One line typed by the user
#[derive(Debug)]
pub enum Command {
    Event(AppEvent),
    Help,
    Empty,
}

impl Command {
    pub fn help() -> &'static str {
        "Available commands:
  n / next          - next page
  p / prev          - previous page
  g N / N           - go to page N
  s N / size N      - show N words per page
  c / page          - show the current page again
  r [N] / random    - random sample of N words (default: page size)
  h / hide          - hide translations
  u / unhide        - show translations
  v WORD            - reveal one translation
  say WORD          - fetch pronunciation
  books             - list wordbooks
  load NAME         - load a wordbook
  download [URL]    - download a wordbook
  cancel            - cancel running downloads
  help              - show this help
  q / quit          - quit"
    }
}

fn parse_number(arg: Option<&str>, what: &str) -> Result<i64, String> {
    let arg = arg.ok_or_else(|| format!("missing {what}"))?;
    arg.parse()
        .map_err(|_| format!("'{arg}' is not a valid {what}"))
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Command::Empty);
        }

        let (head, rest) = match s.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, Some(rest.trim()).filter(|r| !r.is_empty())),
            None => (s, None),
        };

        let event = match head {
            "n" | "next" => AppEvent::NextPage,
            "p" | "prev" => AppEvent::PreviousPage,
            "g" | "goto" => AppEvent::GoToPage(parse_number(rest, "page number")?),
            "s" | "size" => AppEvent::SetPageSize(parse_number(rest, "page size")?),
            "c" | "page" => AppEvent::ShowCurrentPage,
            "r" | "random" => match rest {
                Some(_) => AppEvent::Sample(Some(parse_number(rest, "word count")?)),
                None => AppEvent::Sample(None),
            },
            "h" | "hide" => AppEvent::HideTranslations(true),
            "u" | "unhide" => AppEvent::HideTranslations(false),
            "v" | "reveal" => AppEvent::Reveal(rest.ok_or("missing word")?.to_string()),
            "say" => AppEvent::Pronounce(rest.ok_or("missing word")?.to_string()),
            "books" => AppEvent::RefreshWordbooks,
            "load" => AppEvent::LoadWordbook(rest.ok_or("missing wordbook name")?.to_string()),
            "download" => AppEvent::DownloadWordbook {
                url: rest.map(str::to_string),
            },
            "cancel" => AppEvent::CancelDownload,
            "q" | "quit" | "exit" => AppEvent::Quit,
            "help" | "?" => return Ok(Command::Help),
            _ if head.chars().all(|c| c.is_ascii_digit()) => {
                AppEvent::GoToPage(parse_number(Some(head), "page number")?)
            }
            _ => return Err(format!("Unknown command '{head}', type 'help'")),
        };

        Ok(Command::Event(event))
    }
}

/// Read commands from stdin on a dedicated thread and forward them as events.
///
/// Stdin reads block, so this runs outside the runtime; the thread exits on
/// EOF, on `quit`, or once the event loop has gone away.
pub fn spawn_input_reader(ui_to_app_tx: AsyncSender<AppEvent>, cancel: CancellationToken) {
    thread::spawn(move || {
        forward_lines(io::stdin().lock(), ui_to_app_tx.to_sync(), &cancel);
        tracing::info!("Input reader stopping");
    });
}

/// Parse `input` line by line into events. A full channel blocks the reader
/// until the event loop catches up, so no typed command is dropped.
fn forward_lines<R: BufRead>(input: R, tx: Sender<AppEvent>, cancel: &CancellationToken) {
    for line in input.lines() {
        if cancel.is_cancelled() {
            return;
        }

        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {e}");
                break;
            }
        };

        match line.parse::<Command>() {
            Ok(Command::Event(event)) => {
                let quit = matches!(event, AppEvent::Quit);
                if tx.send(event).is_err() {
                    tracing::warn!("Event loop closed, stopping input");
                    return;
                }
                if quit {
                    return;
                }
            }
            Ok(Command::Help) => println!("{}", Command::help()),
            Ok(Command::Empty) => {}
            Err(e) => println!("{e}"),
        }
    }

    // EOF behaves like quit
    let _ = tx.send(AppEvent::Quit);
}
