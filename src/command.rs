//! Textual commands driving an [`Engine`].
//!
//! One command per string: a name, optionally followed by a count (or an
//! offset for `goto`). Predicates end in `?`.
//!
//! ```text
//! next 2      prev        parent      child
//! delete 3    delete-keep delete-back yank
//! paste-after 2           paste-before
//! first?  last?  root?  top?  initial?  final?
//! goto 120
//! ```

use crate::edit::EditError;
use crate::engine::{EditOutcome, Engine, Placement};
use crate::nav::Move;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NextSibling(usize),
    PrevSibling(usize),
    Parent(usize),
    Child(usize),
    /// Forward delete using the engine's configured blank-line behavior
    Delete(usize),
    /// Forward delete that never removes a blank line
    DeleteKeep(usize),
    DeleteBack(usize),
    Yank(usize),
    Paste(usize, Placement),
    Query(Predicate),
    Goto(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Root,
    TreeRoot,
    First,
    Last,
    Initial,
    Final,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("invalid count '{value}' for '{command}'")]
    InvalidCount { command: String, value: String },

    #[error("'{0}' requires an offset")]
    MissingOffset(String),

    #[error("unexpected argument '{argument}' for '{command}'")]
    UnexpectedArgument { command: String, argument: String },
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().ok_or(CommandParseError::Empty)?;
        let argument = words.next();
        if let Some(extra) = words.next() {
            return Err(CommandParseError::UnexpectedArgument {
                command: name.to_string(),
                argument: extra.to_string(),
            });
        }

        let number = |default: Option<usize>| -> Result<usize, CommandParseError> {
            match argument {
                Some(value) => value.parse().map_err(|_| CommandParseError::InvalidCount {
                    command: name.to_string(),
                    value: value.to_string(),
                }),
                None => default.ok_or_else(|| CommandParseError::MissingOffset(name.to_string())),
            }
        };
        let count = || number(Some(1));

        if let Some(predicate) = name.strip_suffix('?') {
            if let Some(argument) = argument {
                return Err(CommandParseError::UnexpectedArgument {
                    command: name.to_string(),
                    argument: argument.to_string(),
                });
            }
            let predicate = match predicate {
                "root" => Predicate::Root,
                "top" => Predicate::TreeRoot,
                "first" => Predicate::First,
                "last" => Predicate::Last,
                "initial" => Predicate::Initial,
                "final" => Predicate::Final,
                _ => return Err(CommandParseError::Unknown(name.to_string())),
            };
            return Ok(Command::Query(predicate));
        }

        let command = match name {
            "next" => Command::NextSibling(count()?),
            "prev" => Command::PrevSibling(count()?),
            "parent" => Command::Parent(count()?),
            "child" => Command::Child(count()?),
            "delete" => Command::Delete(count()?),
            "delete-keep" => Command::DeleteKeep(count()?),
            "delete-back" => Command::DeleteBack(count()?),
            "yank" => Command::Yank(count()?),
            "paste-after" => Command::Paste(count()?, Placement::After),
            "paste-before" => Command::Paste(count()?, Placement::Before),
            "goto" => Command::Goto(number(None)?),
            _ => return Err(CommandParseError::Unknown(name.to_string())),
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::NextSibling(n) => write!(f, "next {n}"),
            Command::PrevSibling(n) => write!(f, "prev {n}"),
            Command::Parent(n) => write!(f, "parent {n}"),
            Command::Child(n) => write!(f, "child {n}"),
            Command::Delete(n) => write!(f, "delete {n}"),
            Command::DeleteKeep(n) => write!(f, "delete-keep {n}"),
            Command::DeleteBack(n) => write!(f, "delete-back {n}"),
            Command::Yank(n) => write!(f, "yank {n}"),
            Command::Paste(n, Placement::After) => write!(f, "paste-after {n}"),
            Command::Paste(n, Placement::Before) => write!(f, "paste-before {n}"),
            Command::Goto(offset) => write!(f, "goto {offset}"),
            Command::Query(predicate) => {
                let name = match predicate {
                    Predicate::Root => "root",
                    Predicate::TreeRoot => "top",
                    Predicate::First => "first",
                    Predicate::Last => "last",
                    Predicate::Initial => "initial",
                    Predicate::Final => "final",
                };
                write!(f, "{name}?")
            }
        }
    }
}

/// Result of [`Engine::execute`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CommandOutcome {
    Moved(Move),
    Edited(EditOutcome),
    Predicate(bool),
    /// Point after a `goto`, clamped to the buffer
    Jumped(usize),
}

impl CommandOutcome {
    /// False for a movement or edit that did nothing and for a false
    /// predicate.
    pub fn succeeded(&self) -> bool {
        match self {
            CommandOutcome::Moved(moved) => !moved.is_none(),
            CommandOutcome::Edited(outcome) => outcome.did_anything(),
            CommandOutcome::Predicate(value) => *value,
            CommandOutcome::Jumped(_) => true,
        }
    }
}

impl Engine {
    pub fn execute(&mut self, command: Command) -> Result<CommandOutcome, EditError> {
        tracing::debug!(%command, "executing");
        let outcome = match command {
            Command::NextSibling(n) => CommandOutcome::Moved(self.move_next_sibling(n)),
            Command::PrevSibling(n) => CommandOutcome::Moved(self.move_prev_sibling(n)),
            Command::Parent(n) => CommandOutcome::Moved(self.move_parent(n)),
            Command::Child(n) => CommandOutcome::Moved(self.move_child(n)),
            Command::Delete(n) => {
                let keep = self.keep_empty_lines();
                CommandOutcome::Edited(self.delete_forward(n, keep)?)
            }
            Command::DeleteKeep(n) => CommandOutcome::Edited(self.delete_forward(n, true)?),
            Command::DeleteBack(n) => CommandOutcome::Edited(self.delete_backward(n)?),
            Command::Yank(n) => CommandOutcome::Edited(self.yank(n)),
            Command::Paste(n, placement) => CommandOutcome::Edited(self.paste(n, placement)?),
            Command::Query(predicate) => CommandOutcome::Predicate(match predicate {
                Predicate::Root => self.at_root(),
                Predicate::TreeRoot => self.at_tree_root(),
                Predicate::First => self.at_first(),
                Predicate::Last => self.at_last(),
                Predicate::Initial => self.at_initial(),
                Predicate::Final => self.at_final(),
            }),
            Command::Goto(offset) => {
                self.set_point(offset);
                CommandOutcome::Jumped(self.point())
            }
        };
        Ok(outcome)
    }
}
