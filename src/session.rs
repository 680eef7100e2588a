//! Interactive Session
//!
//! Reads commands line by line and turns them into controller events.
//! History fetches run as tokio tasks and report back over a channel, so a
//! new selection can be issued while an older fetch is still in flight; the
//! controller drops whichever response is stale.

use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

use crate::api::{ClientError, HistoryResponse};
use crate::controller::{ChartOutcome, ChartRequest, DashboardController, DashboardError};
use crate::view::DashboardView;

/// Help text listing the session commands
pub const HELP: &str = "Commands:
  select <code>   show the history chart of an indicator
  clear           clear the selection
  days <n>        change the history window
  refresh         reload indicators (and the selected chart)
  help            show this help
  quit            exit";

/// A parsed session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(String),
    Clear,
    Days(u32),
    Refresh,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();

        match (verb.as_str(), arg) {
            ("select" | "s", Some(code)) => Ok(Command::Select(code.to_string())),
            ("select" | "s", None) | ("clear", _) => Ok(Command::Clear),
            ("days" | "d", Some(n)) => n
                .parse()
                .map(Command::Days)
                .map_err(|_| format!("Invalid number of days: {}", n)),
            ("days" | "d", None) => Err("Usage: days <n>".to_string()),
            ("refresh" | "r", _) => Ok(Command::Refresh),
            ("help" | "h" | "?", _) => Ok(Command::Help),
            ("quit" | "q" | "exit", _) => Ok(Command::Quit),
            ("", _) => Err(String::new()),
            (other, _) => Err(format!("Unknown command: {} (type 'help')", other)),
        }
    }
}

type FetchResult = (ChartRequest, Result<HistoryResponse, ClientError>);

/// Run the command loop until `quit` or end of input
///
/// On end of input, fetches still in flight are awaited and applied before
/// returning.
pub async fn run<R, V>(
    controller: &mut DashboardController<V>,
    input: R,
) -> Result<(), DashboardError>
where
    R: AsyncBufRead + Unpin,
    V: DashboardView,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchResult>();
    let mut lines = input.lines();
    let mut input_open = true;
    let mut pending = 0usize;

    loop {
        if !input_open && pending == 0 {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if input_open => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        input_open = false;
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read input");
                        input_open = false;
                        continue;
                    }
                };

                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(message) => {
                        if !message.is_empty() {
                            controller.view_mut().show_notice(&message);
                        }
                        continue;
                    }
                };
                tracing::debug!(?command, "Command");

                let request = match command {
                    Command::Select(code) => controller.begin_selection(Some(&code)),
                    Command::Clear => controller.begin_selection(None),
                    Command::Days(days) => match controller.begin_days_change(days) {
                        Ok(request) => request,
                        Err(e) => {
                            controller.view_mut().show_notice(&e.to_string());
                            None
                        }
                    },
                    Command::Refresh => {
                        // Refresh failures are already on screen
                        let _ = controller.refresh().await;
                        None
                    }
                    Command::Help => {
                        controller.view_mut().show_notice(HELP);
                        None
                    }
                    Command::Quit => break,
                };

                if let Some(request) = request {
                    spawn_fetch(controller, request, tx.clone());
                    pending += 1;
                }
            }
            Some((request, result)) = rx.recv(), if pending > 0 => {
                pending -= 1;
                if controller.apply_chart_response(&request, result) == ChartOutcome::Stale {
                    tracing::debug!(id = request.id, "Stale response dropped");
                }
            }
        }
    }

    Ok(())
}

fn spawn_fetch<V: DashboardView>(
    controller: &DashboardController<V>,
    request: ChartRequest,
    tx: mpsc::UnboundedSender<FetchResult>,
) {
    let source = controller.source();
    tokio::spawn(async move {
        let result = source.history(&request.code, request.days).await;
        // Receiver gone means the session ended
        let _ = tx.send((request, result));
    });
}
