use crate::mode::{Frontend, Mode, ModeEvent};
use crate::ts::language_from_name;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub highlight: HighlightSettings,
    #[serde(default)]
    pub modes: ModeSettings,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.engine.language.trim().is_empty() {
            issues.push(ValidationIssue::MissingField {
                field: "engine.language",
            });
        } else if language_from_name(&self.engine.language).is_err() {
            issues.push(ValidationIssue::UnknownLanguage {
                name: self.engine.language.clone(),
            });
        }

        if self.engine.kill_ring_capacity == 0 {
            issues.push(ValidationIssue::InvalidValue {
                field: "engine.kill_ring_capacity",
                message: "must be at least 1".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for rule in &self.modes.transitions {
            if !seen.insert((rule.from, rule.event)) {
                issues.push(ValidationIssue::DuplicateTransition {
                    from: rule.from,
                    event: rule.event,
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineSettings {
    /// Grammar name or alias understood by ast-grep-language
    pub language: String,
    pub frontend: Frontend,
    /// Default for forward deletes issued without an explicit choice
    pub keep_empty_lines: bool,
    pub kill_ring_capacity: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            language: "rust".to_string(),
            frontend: Frontend::default(),
            keep_empty_lines: false,
            kill_ring_capacity: crate::clipboard::DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HighlightSettings {
    pub enabled: bool,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ModeSettings {
    #[serde(default)]
    pub transitions: Vec<TransitionRule>,
}

/// Override for a single mode transition.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: Mode,
    pub event: ModeEvent,
    pub to: Mode,
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingField {
        field: &'static str,
    },
    UnknownLanguage {
        name: String,
    },
    InvalidValue {
        field: &'static str,
        message: String,
    },
    DuplicateTransition {
        from: Mode,
        event: ModeEvent,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingField { field } => {
                write!(f, "missing required field '{field}'")
            }
            ValidationIssue::UnknownLanguage { name } => {
                write!(f, "unsupported language '{name}'")
            }
            ValidationIssue::InvalidValue { field, message } => {
                write!(f, "invalid value for '{field}': {message}")
            }
            ValidationIssue::DuplicateTransition { from, event } => {
                write!(f, "transition from {from} on {event} is defined more than once")
            }
        }
    }
}
