//! Line-oriented driver for a [`LedgerStore`].
//!
//! Each command that changes the ledger is followed by a full recompute so
//! every figure printed afterwards reflects the current entries.

use std::io::{BufRead, Write};
use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::core::{EntryError, ItemRef, LedgerStore};
use crate::display;
use crate::input::{InputError, Submission};

pub const HELP: &str = "\
Commands:
  add <inc|exp> <description> <value>   record an entry
  delete <inc-N|exp-N>                  remove an entry (aliases: del, rm)
  list                                  show all entries
  summary                               show the budget
  help                                  show this text
  quit                                  stop reading commands
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    UnknownCommand(String),
    MissingArgument(&'static str),
    UnexpectedArgument(String),
    InvalidItemRef(String),
    Quoting(String),
    Input(InputError),
    Entry(EntryError),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::UnknownCommand(c) => write!(f, "unknown command `{c}`, try `help`"),
            CommandError::MissingArgument(a) => write!(f, "missing argument: {a}"),
            CommandError::UnexpectedArgument(a) => write!(f, "unexpected argument `{a}`"),
            CommandError::InvalidItemRef(r) => {
                write!(f, "invalid item reference `{r}`, expected inc-N or exp-N")
            }
            CommandError::Quoting(msg) => write!(f, "cannot split command: {msg}"),
            CommandError::Input(e) => write!(f, "{e}"),
            CommandError::Entry(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::Input(e) => Some(e),
            CommandError::Entry(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InputError> for CommandError {
    fn from(e: InputError) -> Self {
        CommandError::Input(e)
    }
}

impl From<EntryError> for CommandError {
    fn from(e: EntryError) -> Self {
        CommandError::Entry(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        tag: String,
        description: String,
        value: String,
    },
    Delete(ItemRef),
    List,
    Summary,
    Help,
    Quit,
}

impl Command {
    /// Parses one script line. Blank lines and `#` comments yield `None`.
    pub fn parse_line(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        line.parse().map(Some)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = shell_words::split(s).map_err(|e| CommandError::Quoting(e.to_string()))?;
        let (name, args) = tokens
            .split_first()
            .ok_or(CommandError::MissingArgument("command"))?;
        let cmd = match name.to_ascii_lowercase().as_str() {
            "add" => {
                let (tag, rest) = args
                    .split_first()
                    .ok_or(CommandError::MissingArgument("type"))?;
                let (value, words) = rest
                    .split_last()
                    .ok_or(CommandError::MissingArgument("value"))?;
                if words.is_empty() {
                    return Err(CommandError::MissingArgument("description"));
                }
                return Ok(Command::Add {
                    tag: tag.clone(),
                    description: words.join(" "),
                    value: value.clone(),
                });
            }
            "delete" | "del" | "rm" => {
                let target = args.first().ok_or(CommandError::MissingArgument("item"))?;
                if let Some(extra) = args.get(1) {
                    return Err(CommandError::UnexpectedArgument(extra.clone()));
                }
                let target = target
                    .parse::<ItemRef>()
                    .map_err(|_| CommandError::InvalidItemRef(target.clone()))?;
                return Ok(Command::Delete(target));
            }
            "list" | "ls" => Command::List,
            "summary" | "budget" => Command::Summary,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::UnknownCommand(other.to_string())),
        };
        match args.first() {
            Some(extra) => Err(CommandError::UnexpectedArgument(extra.clone())),
            None => Ok(cmd),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Counts reported by [`Session::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub executed: usize,
    pub failed: usize,
}

/// A ledger plus the presentation settings used to report on it.
pub struct Session {
    store: LedgerStore,
    format: OutputFormat,
    date: NaiveDate,
}

impl Session {
    /// `date` only feeds the month heading.
    pub fn new(store: LedgerStore, format: OutputFormat, date: NaiveDate) -> Self {
        Self {
            store,
            format,
            date,
        }
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn into_store(self) -> LedgerStore {
        self.store
    }

    /// Runs a single command and returns the text to show.
    pub fn execute(&mut self, command: Command) -> Result<String, CommandError> {
        match command {
            Command::Add {
                tag,
                description,
                value,
            } => {
                let submission = Submission::parse(&tag, &description, &value)?;
                let entry = self.store.add_item(
                    submission.kind,
                    submission.description,
                    submission.value,
                )?;
                self.store.recompute();
                Ok(match self.format {
                    OutputFormat::Text => format!(
                        "Added {} {} {}\n{}",
                        entry.item_ref(),
                        entry.description,
                        display::format_amount(entry.value, entry.kind),
                        self.summary_text()
                    ),
                    OutputFormat::Json => json!({
                        "added": entry,
                        "budget": self.store.get_budget(),
                        "percentages": self.store.get_percentages(),
                    })
                    .to_string(),
                })
            }
            Command::Delete(target) => {
                let removed = self.store.delete_item(target.kind, target.id);
                self.store.recompute();
                Ok(match self.format {
                    OutputFormat::Text => {
                        let head = if removed { "Deleted" } else { "No entry" };
                        format!("{head} {target}\n{}", self.summary_text())
                    }
                    OutputFormat::Json => json!({
                        "deleted": target.to_string(),
                        "removed": removed,
                        "budget": self.store.get_budget(),
                        "percentages": self.store.get_percentages(),
                    })
                    .to_string(),
                })
            }
            Command::List => Ok(match self.format {
                OutputFormat::Text => display::render_entries(&self.store),
                OutputFormat::Json => json!({
                    "income": self.store.income(),
                    "expenses": self.store.expenses(),
                })
                .to_string(),
            }),
            Command::Summary => Ok(match self.format {
                OutputFormat::Text => self.summary_text(),
                OutputFormat::Json => json!({
                    "budget": self.store.get_budget(),
                    "percentages": self.store.get_percentages(),
                })
                .to_string(),
            }),
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    fn summary_text(&self) -> String {
        display::render_summary(&self.store.get_budget(), self.date)
    }

    /// Executes every line of `input`, writing results to `out` and per-line
    /// failures to `err`. Stops early on `quit`.
    pub fn run<R: BufRead, W: Write, E: Write>(
        &mut self,
        input: R,
        mut out: W,
        mut err: E,
    ) -> std::io::Result<RunReport> {
        info!("Session started");
        let mut report = RunReport::default();
        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            let lineno = idx + 1;
            let result = Command::parse_line(&line).and_then(|cmd| match cmd {
                Some(Command::Quit) => Ok(None),
                Some(cmd) => self.execute(cmd).map(Some),
                None => Ok(Some(String::new())),
            });
            match result {
                Ok(None) => {
                    debug!(line = lineno, "Quit requested");
                    break;
                }
                Ok(Some(text)) if text.is_empty() => {}
                Ok(Some(text)) => {
                    report.executed += 1;
                    if text.ends_with('\n') {
                        write!(out, "{text}")?;
                    } else {
                        writeln!(out, "{text}")?;
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(line = lineno, error = %e, "Command failed");
                    writeln!(err, "line {lineno}: {e}")?;
                }
            }
        }
        out.flush()?;
        info!(
            executed = report.executed,
            failed = report.failed,
            "Session finished"
        );
        Ok(report)
    }
}
