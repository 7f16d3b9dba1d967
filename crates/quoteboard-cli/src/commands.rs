use std::path::PathBuf;

use quoteboard_core::constants::{ALL_CATEGORIES, DEFAULT_EXPORT_FILE};
use quoteboard_core::models::categories_match;
use quoteboard_core::sync::{SyncEngine, TickOutcome};
use quoteboard_core::view::View;
use quoteboard_core::QuoteBoard;

/// One user action, shared by the one-shot subcommands and the REPL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Restore the last displayed quote without picking a new one
    Show,
    /// Pick a new random quote from the current filter
    Next,
    Add { text: String, category: String },
    List,
    Categories,
    Filter(String),
    Export(Option<PathBuf>),
    Import(PathBuf),
    Sync,
    Help,
    Quit,
}

pub enum CommandResult {
    Lines(Vec<String>),
    /// The action was rejected; lines explain why
    Failed(Vec<String>),
    Quit,
}

pub const REPL_HELP: &[&str] = &[
    "Commands:",
    "  next                      show a random quote",
    "  add <category> | <text>   add a quote",
    "  filter <name|all>         filter by category",
    "  categories                list categories",
    "  list                      list quotes in the current filter",
    "  export [path]             export all quotes as JSON",
    "  import <path>             import quotes from a JSON array",
    "  sync                      push and fetch now",
    "  help                      show this help",
    "  quit                      exit",
];

impl Command {
    /// Parse a REPL line. `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_lowercase().as_str() {
            "show" => Command::Show,
            "next" | "n" => Command::Next,
            "add" => {
                let Some((category, text)) = rest.split_once('|') else {
                    return Err("Usage: add <category> | <text>".to_string());
                };
                Command::Add {
                    text: text.trim().to_string(),
                    category: category.trim().to_string(),
                }
            }
            "list" | "ls" => Command::List,
            "categories" => Command::Categories,
            "filter" => Command::Filter(rest.to_string()),
            "export" => Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
            "import" => {
                if rest.is_empty() {
                    return Err("Usage: import <path>".to_string());
                }
                Command::Import(PathBuf::from(rest))
            }
            "sync" => Command::Sync,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("Unknown command: {other} (try 'help')")),
        };
        Ok(Some(command))
    }
}

fn summary_line(selected: &str, visible: usize, total: usize) -> String {
    format!("[filter: {selected}] {visible} of {total} quotes")
}

pub fn format_view(view: &View) -> Vec<String> {
    let quote_line = view
        .quote_line
        .clone()
        .unwrap_or_else(|| "(no quote shown yet, try 'next')".to_string());
    vec![
        quote_line,
        summary_line(&view.selected, view.visible_count, view.total_count),
    ]
}

/// Run one command against the board. Notifications raised along the way
/// are left in the board's history for the caller to print.
pub async fn execute(board: &QuoteBoard, engine: &SyncEngine, command: Command) -> CommandResult {
    match command {
        Command::Show => CommandResult::Lines(format_view(&board.current_view())),
        Command::Next => CommandResult::Lines(format_view(&board.show_random())),
        Command::Add { text, category } => match board.add_quote(&text, &category) {
            Ok(quote) => CommandResult::Lines(vec![quote.display_line()]),
            Err(e) => {
                tracing::debug!("add rejected: {}", e);
                CommandResult::Failed(Vec::new())
            }
        },
        Command::List => {
            let filter = board.filter();
            let quotes = board.quotes();
            let mut lines: Vec<String> = quotes
                .iter()
                .filter(|q| filter.matches(&q.category))
                .enumerate()
                .map(|(i, q)| format!("{:>3}. {}", i + 1, q.display_line()))
                .collect();
            lines.push(summary_line(filter.label(), lines.len(), quotes.len()));
            CommandResult::Lines(lines)
        }
        Command::Categories => {
            let selected = board.filter();
            let lines = std::iter::once(ALL_CATEGORIES.to_string())
                .chain(board.categories())
                .map(|option| {
                    let marker = if categories_match(&option, selected.label()) { "*" } else { " " };
                    format!("{marker} {option}")
                })
                .collect();
            CommandResult::Lines(lines)
        }
        Command::Filter(name) => match board.set_filter(&name) {
            Ok(_) => CommandResult::Lines(format_view(&board.current_view())),
            Err(e) => {
                tracing::debug!("filter not saved: {}", e);
                CommandResult::Failed(Vec::new())
            }
        },
        Command::Export(path) => {
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));
            match board.export(&path) {
                Ok(_) => CommandResult::Lines(Vec::new()),
                Err(_) => CommandResult::Failed(Vec::new()),
            }
        }
        Command::Import(path) => match board.import(&path) {
            Ok(_) => CommandResult::Lines(Vec::new()),
            Err(_) => CommandResult::Failed(Vec::new()),
        },
        Command::Sync => match engine.tick().await {
            TickOutcome::Completed(report) => {
                let line = format!(
                    "sync: pushed={} fetched={} merged={}",
                    report.pushed, report.fetched, report.merged
                );
                if report.pushed {
                    CommandResult::Lines(vec![line])
                } else {
                    CommandResult::Failed(vec![line])
                }
            }
            TickOutcome::Skipped => {
                CommandResult::Lines(vec!["sync: already in progress".to_string()])
            }
        },
        Command::Help => CommandResult::Lines(REPL_HELP.iter().map(|l| l.to_string()).collect()),
        Command::Quit => CommandResult::Quit,
    }
}

/// Drain everything the board announced since the last call
pub fn drain_notifications(board: &QuoteBoard) -> Vec<String> {
    board
        .notifications()
        .take_history()
        .iter()
        .map(|n| n.line())
        .collect()
}
