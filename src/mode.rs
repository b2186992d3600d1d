//! Mode layer: which editing mode is active and how events move between them.
//!
//! The engine itself is mode-agnostic. This layer decides when structural
//! mode starts and ends, and keeps the cursor honest across those
//! boundaries: entering structural mode resolves and highlights the current
//! node, leaving it (or any external edit) invalidates the cursor.

use crate::config::TransitionRule;
use crate::engine::Engine;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Normal,
    Insert,
    Structural,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Normal => "normal",
            Mode::Insert => "insert",
            Mode::Structural => "structural",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeEvent {
    EnterStructural,
    ExitStructural,
    EnterInsert,
    Escape,
    /// The text changed outside the engine's own operations
    ExternalEdit,
}

impl fmt::Display for ModeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModeEvent::EnterStructural => "enter-structural",
            ModeEvent::ExitStructural => "exit-structural",
            ModeEvent::EnterInsert => "enter-insert",
            ModeEvent::Escape => "escape",
            ModeEvent::ExternalEdit => "external-edit",
        };
        f.write_str(name)
    }
}

/// Kind of editing front end hosting the engine, chosen once from config.
///
/// A modal front end has a normal mode to fall back to; a plain front end
/// only knows insertion, so leaving structural mode lands there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frontend {
    #[default]
    Modal,
    Plain,
}

impl Frontend {
    pub fn initial_mode(self) -> Mode {
        match self {
            Frontend::Modal => Mode::Normal,
            Frontend::Plain => Mode::Insert,
        }
    }

    /// Where structural mode exits to.
    pub fn resting_mode(self) -> Mode {
        self.initial_mode()
    }

    pub fn default_transitions(self) -> HashMap<(Mode, ModeEvent), Mode> {
        use Mode::*;
        use ModeEvent::*;

        let rest = self.resting_mode();
        let mut table = HashMap::from([
            ((Structural, ExitStructural), rest),
            ((Structural, Escape), rest),
            ((Structural, EnterInsert), Insert),
            ((Insert, EnterStructural), Structural),
        ]);

        if self == Frontend::Modal {
            table.extend([
                ((Normal, EnterStructural), Structural),
                ((Normal, EnterInsert), Insert),
                ((Insert, Escape), Normal),
            ]);
        }

        table
    }
}

/// Explicit mode state plus its transition table.
#[derive(Debug, Clone)]
pub struct ModeMachine {
    current: Mode,
    transitions: HashMap<(Mode, ModeEvent), Mode>,
}

impl ModeMachine {
    pub fn new(frontend: Frontend) -> Self {
        Self {
            current: frontend.initial_mode(),
            transitions: frontend.default_transitions(),
        }
    }

    /// Frontend defaults with configured overrides layered on top.
    pub fn with_overrides(frontend: Frontend, rules: &[TransitionRule]) -> Self {
        let mut machine = Self::new(frontend);
        for rule in rules {
            machine.transitions.insert((rule.from, rule.event), rule.to);
        }
        machine
    }

    pub fn current(&self) -> Mode {
        self.current
    }

    /// Target of `event` from the current mode, without applying it.
    pub fn target(&self, event: ModeEvent) -> Mode {
        self.transitions
            .get(&(self.current, event))
            .copied()
            .unwrap_or(self.current)
    }

    /// Apply `event`, keeping `engine`'s cursor consistent with the new mode.
    pub fn handle(&mut self, event: ModeEvent, engine: &mut Engine) -> Mode {
        let from = self.current;
        let to = self.target(event);

        if event == ModeEvent::ExternalEdit {
            engine.invalidate_cursor();
        }

        match (from == Mode::Structural, to == Mode::Structural) {
            (false, true) => {
                let _ = engine.current();
            }
            (true, false) => engine.invalidate_cursor(),
            _ => {}
        }

        if from != to {
            tracing::debug!(%from, %to, %event, "mode transition");
        }
        self.current = to;
        to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modal_frontend_rests_in_normal() {
        let machine = ModeMachine::new(Frontend::Modal);
        assert_eq!(machine.current(), Mode::Normal);
        assert_eq!(machine.target(ModeEvent::EnterStructural), Mode::Structural);
    }

    #[test]
    fn plain_frontend_rests_in_insert() {
        let machine = ModeMachine::new(Frontend::Plain);
        assert_eq!(machine.current(), Mode::Insert);
        assert_eq!(machine.target(ModeEvent::Escape), Mode::Insert);
        assert_eq!(machine.target(ModeEvent::EnterStructural), Mode::Structural);
    }

    #[test]
    fn overrides_replace_defaults() {
        let machine = ModeMachine::with_overrides(
            Frontend::Modal,
            &[TransitionRule {
                from: Mode::Normal,
                event: ModeEvent::EnterStructural,
                to: Mode::Insert,
            }],
        );
        assert_eq!(machine.target(ModeEvent::EnterStructural), Mode::Insert);
    }

    #[test]
    fn unknown_event_keeps_mode() {
        let machine = ModeMachine::new(Frontend::Plain);
        assert_eq!(machine.target(ModeEvent::ExitStructural), Mode::Insert);
    }
}
