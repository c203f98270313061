//! Battle-log observation
//!
//! Only the handful of lines the engine learns from are parsed:
//!
//! ```text
//! |move|p1a: Pikachu|Thunderbolt|p2a: Dugtrio
//! |-immune|p2a: Dugtrio
//! |turn|7
//! |win|Someone
//! |tie
//! ```
//!
//! An `-immune` right after a `move` records a zero-damage outcome for that
//! (attacker, defender, move) triple, so the estimator stops suggesting it.

use anyhow::{Context, Result, anyhow};
use tactician_battle::{BattleState, Player, RosterSlot, to_id};

use crate::memory::{MatchSession, OutcomeKey};

/// Combatant reference in the form "POSITION: NAME" (e.g. "p2a: Dugtrio")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonRef {
    pub player: Player,
    pub name: String,
}

impl PokemonRef {
    pub fn parse(s: &str) -> Option<Self> {
        let (position, name) = s.split_once(": ")?;
        let player = Player::parse(position.get(..2)?)?;
        Some(Self {
            player,
            name: name.to_string(),
        })
    }

    /// Roster slot in the snapshot, from our point of view
    pub fn resolve(&self, state: &BattleState) -> Option<RosterSlot> {
        let side = state.side_of(self.player);
        state.side(side).find(&self.name).map(|c| c.slot)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    Move {
        user: PokemonRef,
        move_id: String,
        target: Option<PokemonRef>,
    },
    Immune {
        target: PokemonRef,
    },
    Turn(u32),
    Win(String),
    Tie,
    /// Anything the engine does not track
    Other,
}

impl LogEvent {
    /// Whether the match is over
    pub fn ends_match(&self) -> bool {
        matches!(self, LogEvent::Win(_) | LogEvent::Tie)
    }
}

fn parse_pokemon(parts: &[&str], index: usize) -> Result<PokemonRef> {
    let raw = parts.get(index).ok_or_else(|| anyhow!("Missing pokemon"))?;
    PokemonRef::parse(raw).ok_or_else(|| anyhow!("Invalid pokemon reference: {}", raw))
}

/// Parse one protocol line
pub fn parse_log_line(line: &str) -> Result<LogEvent> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.first() != Some(&"") {
        return Ok(LogEvent::Other);
    }

    match parts.get(1).copied().unwrap_or("") {
        "move" => {
            let user = parse_pokemon(&parts, 2)?;
            let move_name = parts.get(3).ok_or_else(|| anyhow!("Missing move name"))?;
            let target = parts.get(4).and_then(|s| PokemonRef::parse(s));
            Ok(LogEvent::Move {
                user,
                move_id: to_id(move_name),
                target,
            })
        }
        "-immune" => Ok(LogEvent::Immune {
            target: parse_pokemon(&parts, 2)?,
        }),
        "turn" => {
            let raw = parts.get(2).ok_or_else(|| anyhow!("Missing turn number"))?;
            let turn = raw
                .parse::<u32>()
                .with_context(|| format!("Invalid turn number: {}", raw))?;
            Ok(LogEvent::Turn(turn))
        }
        "win" => Ok(LogEvent::Win(parts.get(2).unwrap_or(&"").to_string())),
        "tie" => Ok(LogEvent::Tie),
        _ => Ok(LogEvent::Other),
    }
}

/// Apply an event to the match memory. Returns true once the match is over.
pub fn observe(session: &mut MatchSession, state: &BattleState, event: &LogEvent) -> bool {
    match event {
        LogEvent::Move { user, move_id, .. } => {
            session.last_move = match user.resolve(state) {
                Some(slot) => Some((slot, move_id.clone())),
                None => {
                    tracing::debug!(name = %user.name, "Move user not in snapshot");
                    None
                }
            };
        }
        LogEvent::Immune { target } => {
            let Some((attacker, move_id)) = session.last_move.take() else {
                return false;
            };
            let Some(defender) = target.resolve(state) else {
                tracing::debug!(name = %target.name, "Immune target not in snapshot");
                return false;
            };
            tracing::info!(
                match_id = %session.match_id(),
                attacker = %attacker,
                defender = %defender,
                move_id = %move_id,
                "Recorded immunity"
            );
            session
                .memory
                .record_outcome(OutcomeKey::new(attacker, defender, move_id), 0.0);
        }
        LogEvent::Turn(_) => session.last_move = None,
        LogEvent::Win(_) | LogEvent::Tie | LogEvent::Other => {}
    }
    event.ends_match()
}
