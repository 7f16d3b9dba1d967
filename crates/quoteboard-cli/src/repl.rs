use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use quoteboard_core::notifications::{SharedNotifications, Toast};
use quoteboard_core::QuoteBoard;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::commands::{execute, format_view, Command, CommandResult};

/// How often toasts are checked for arrival and expiry
const TICK_INTERVAL_MS: u64 = 250;

const CLEAR_LINE: &str = "\r\x1b[2K";

/// Tracks which toasts were already printed and what the prompt shows.
#[derive(Debug, Default)]
pub struct ToastView {
    last_printed: u64,
    headline: Option<u64>,
}

impl ToastView {
    /// Lines for toasts raised since the last call
    pub fn fresh_lines(&mut self, notifications: &SharedNotifications) -> Vec<String> {
        let fresh = notifications.toasts_since(self.last_printed);
        if let Some(last) = fresh.last() {
            self.last_printed = last.id;
        }
        fresh.iter().map(|t| t.notification.line()).collect()
    }

    /// Record the current headline; true when the prompt needs redrawing
    pub fn update_headline(&mut self, headline: Option<&Toast>) -> bool {
        let id = headline.map(|t| t.id);
        let changed = id != self.headline;
        self.headline = id;
        changed
    }
}

pub fn prompt_text(headline: Option<&Toast>) -> String {
    match headline {
        Some(toast) => format!("[{}] > ", toast.notification.line()),
        None => "> ".to_string(),
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

fn prompt(headline: Option<&Toast>) {
    print!("{}", prompt_text(headline));
    let _ = std::io::stdout().flush();
}

/// Interactive loop. The sync engine ticks in the background for as long as
/// the loop runs; its toasts are printed as they arrive.
pub async fn run(board: QuoteBoard) -> Result<()> {
    let engine = Arc::new(board.sync_engine().context("Failed to build sync engine")?);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sync_task = tokio::spawn(Arc::clone(&engine).run(shutdown_rx));

    let notifications = board.notifications();
    let mut toasts = ToastView::default();

    println!("quoteboard: type 'help' for commands");
    print_lines(&format_view(&board.current_view()));
    let headline = notifications.headline();
    toasts.update_headline(headline.as_ref());
    prompt(headline.as_ref());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                match Command::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(command)) => match execute(&board, &engine, command).await {
                        CommandResult::Lines(out) | CommandResult::Failed(out) => print_lines(&out),
                        CommandResult::Quit => break,
                    },
                    Err(usage) => println!("{usage}"),
                }

                print_lines(&toasts.fresh_lines(&notifications));
                let headline = notifications.headline();
                toasts.update_headline(headline.as_ref());
                prompt(headline.as_ref());
            }
            _ = tick.tick() => {
                notifications.expire();
                let fresh = toasts.fresh_lines(&notifications);
                let headline = notifications.headline();
                let redraw = toasts.update_headline(headline.as_ref());

                if !fresh.is_empty() {
                    print!("{CLEAR_LINE}");
                    print_lines(&fresh);
                    prompt(headline.as_ref());
                } else if redraw {
                    print!("{CLEAR_LINE}");
                    prompt(headline.as_ref());
                }
            }
        }
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = sync_task.await {
        tracing::warn!("sync task ended abnormally: {}", e);
    }
    Ok(())
}
