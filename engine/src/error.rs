use tactician_battle::RosterSlot;
use thiserror::Error;

use crate::action::Action;

/// Failures inside the per-turn cascade.
///
/// None of these are fatal: the engine logs them and falls back to the
/// maximum-damage move (or a random legal action).
#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("No active combatant on our side")]
    NoActive,

    #[error("No active opposing combatant")]
    NoOpponent,

    #[error("Unknown combatant {0}")]
    UnknownCombatant(RosterSlot),

    #[error("Rule {rule} produced an illegal action: {action}")]
    IllegalAction { rule: &'static str, action: Action },
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
