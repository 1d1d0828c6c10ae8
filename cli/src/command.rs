//! Parsing of interactive input lines.

use std::str::FromStr;

use thiserror::Error;
use todo_core::filter::UnknownFilter;
use todo_core::{Action, Filter, TodoId};

pub const HELP: &str = "\
commands:
  add <title>                     add a todo
  toggle <id>                     flip completed
  delete <id>                     remove a todo
  filter all|active|completed     change the visible set
  refresh                         reload from the server
  help                            show this text
  quit                            exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(TodoId),
    Delete(TodoId),
    Filter(Filter),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command {0:?}; type `help` for a list")]
    Unknown(String),

    #[error("`{0}` needs a todo id")]
    MissingId(&'static str),

    #[error("invalid todo id {0:?}")]
    InvalidId(String),

    #[error("`filter` needs one of all, active, completed")]
    MissingFilter,

    #[error(transparent)]
    Filter(#[from] UnknownFilter),
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            // The title is passed through untouched; blank titles are
            // rejected by the state, not here.
            "add" | "a" => Command::Add(rest.to_string()),
            "toggle" | "t" => Command::Toggle(parse_id("toggle", rest)?),
            "delete" | "del" | "rm" => Command::Delete(parse_id("delete", rest)?),
            "filter" | "f" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingFilter);
                }
                Command::Filter(rest.parse()?)
            }
            "refresh" | "r" => Command::Refresh,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }

    /// The state actions this command stands for, in dispatch order.
    pub fn actions(self) -> Vec<Action> {
        match self {
            Command::Add(title) => vec![Action::SetInput(title), Action::Add],
            Command::Toggle(id) => vec![Action::Toggle(id)],
            Command::Delete(id) => vec![Action::Delete(id)],
            Command::Filter(filter) => vec![Action::SetFilter(filter)],
            Command::Refresh => vec![Action::Load],
            Command::Help | Command::Quit => Vec::new(),
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)?.ok_or_else(|| CommandError::Unknown(String::new()))
    }
}

fn parse_id(command: &'static str, arg: &str) -> Result<TodoId, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingId(command));
    }
    arg.parse().map_err(|_| CommandError::InvalidId(arg.to_string()))
}
