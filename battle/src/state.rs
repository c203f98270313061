//! Per-turn battle snapshot handed to the decision engine

use std::borrow::Borrow;

use crate::types::{Combatant, Move, RosterSlot, SideId, SideState};

/// Player in a battle (p1, p2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    P1,
    P2,
}

impl Player {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "p1" => Some(Player::P1),
            "p2" => Some(Player::P2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Player::P1 => "p1",
            Player::P2 => "p2",
        }
    }
}

/// Stable identifier of one match (the battle room id, e.g. "battle-gen9ubers-123")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MatchId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MatchId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for MatchId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Observable state of one decision point.
///
/// Built by the transport layer from the server's request and the tracked
/// battle; the engine only reads it. Team preview uses the same shape with
/// `turn == 0` and no legal moves.
#[derive(Debug, Clone)]
pub struct BattleState {
    pub match_id: MatchId,

    /// Which player tag we are in the battle log
    pub player: Player,

    /// Current turn number (0 = team preview)
    pub turn: u32,

    pub ally: SideState,
    pub foe: SideState,

    /// Moves the active combatant may legally use this turn
    pub available_moves: Vec<Move>,

    /// Ally roster indices that may legally be switched in this turn
    pub available_switches: Vec<usize>,

    /// The active combatant must be replaced before anything else
    pub force_switch: bool,

    pub can_terastallize: bool,
}

impl BattleState {
    pub fn new(match_id: impl Into<MatchId>, player: Player) -> Self {
        Self {
            match_id: match_id.into(),
            player,
            turn: 0,
            ally: SideState::default(),
            foe: SideState::default(),
            available_moves: Vec::new(),
            available_switches: Vec::new(),
            force_switch: false,
            can_terastallize: false,
        }
    }

    pub fn side(&self, side: SideId) -> &SideState {
        match side {
            SideId::Ally => &self.ally,
            SideId::Foe => &self.foe,
        }
    }

    pub fn side_mut(&mut self, side: SideId) -> &mut SideState {
        match side {
            SideId::Ally => &mut self.ally,
            SideId::Foe => &mut self.foe,
        }
    }

    /// Map a log player tag to our perspective
    pub fn side_of(&self, player: Player) -> SideId {
        if player == self.player {
            SideId::Ally
        } else {
            SideId::Foe
        }
    }

    pub fn combatant(&self, slot: RosterSlot) -> Option<&Combatant> {
        self.side(slot.side).get(slot.index)
    }

    pub fn combatant_mut(&mut self, slot: RosterSlot) -> Option<&mut Combatant> {
        self.side_mut(slot.side).get_mut(slot.index)
    }

    /// Our active combatant
    pub fn active(&self) -> Option<&Combatant> {
        self.ally.active_combatant()
    }

    /// The opponent's active combatant
    pub fn opponent(&self) -> Option<&Combatant> {
        self.foe.active_combatant()
    }

    pub fn find_move(&self, id: &str) -> Option<&Move> {
        self.available_moves.iter().find(|m| m.id == id)
    }

    pub fn can_use_move(&self, id: &str) -> bool {
        !self.force_switch && self.find_move(id).is_some()
    }

    pub fn can_switch_to(&self, index: usize) -> bool {
        self.available_switches.contains(&index)
    }
}
