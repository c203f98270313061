//! Cross-turn memory scoped to one match

use std::collections::{HashMap, HashSet};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tactician_battle::{MatchId, RosterSlot};

use crate::damage::DamageRange;

/// (attacker, defender, move) triple that determines a damage outcome
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutcomeKey {
    pub attacker: RosterSlot,
    pub defender: RosterSlot,
    pub move_id: String,
}

impl OutcomeKey {
    pub fn new(attacker: RosterSlot, defender: RosterSlot, move_id: impl Into<String>) -> Self {
        Self {
            attacker,
            defender,
            move_id: move_id.into(),
        }
    }
}

/// Small mutable state the heuristics consult between turns.
///
/// Created when the match starts (team preview) and dropped with its
/// [`MatchSession`] when the match ends.
#[derive(Debug, Default)]
pub struct MatchMemory {
    /// Opponents already hit by the one-time debuff move
    debuffed: HashSet<RosterSlot>,

    /// Opponents already targeted with the persistent poison move
    poisoned: HashSet<RosterSlot>,

    /// Turn a delayed-damage move was last chosen
    last_delayed_turn: Option<u32>,

    /// Damage seen in the battle log (immunities record 0)
    observed: HashMap<OutcomeKey, f32>,

    /// Calculator results for the current turn only
    computed: HashMap<OutcomeKey, DamageRange>,
    computed_turn: u32,
}

impl MatchMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn was_debuffed(&self, target: RosterSlot) -> bool {
        self.debuffed.contains(&target)
    }

    /// Returns false if the target was already recorded
    pub fn record_debuff(&mut self, target: RosterSlot) -> bool {
        self.debuffed.insert(target)
    }

    pub fn was_poisoned(&self, target: RosterSlot) -> bool {
        self.poisoned.contains(&target)
    }

    pub fn record_poison(&mut self, target: RosterSlot) -> bool {
        self.poisoned.insert(target)
    }

    pub fn last_delayed_turn(&self) -> Option<u32> {
        self.last_delayed_turn
    }

    /// Whether at least `cooldown` turns passed since the delayed move was last used
    pub fn delayed_ready(&self, turn: u32, cooldown: u32) -> bool {
        self.last_delayed_turn
            .is_none_or(|last| turn.saturating_sub(last) >= cooldown)
    }

    pub fn record_delayed(&mut self, turn: u32) {
        self.last_delayed_turn = Some(turn);
    }

    /// Damage previously seen for this triple
    pub fn observed(&self, key: &OutcomeKey) -> Option<f32> {
        self.observed.get(key).copied()
    }

    pub fn record_outcome(&mut self, key: OutcomeKey, damage: f32) {
        self.observed.insert(key, damage.max(0.0));
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Calculator result memoised earlier in the same turn
    pub fn memoized(&self, turn: u32, key: &OutcomeKey) -> Option<DamageRange> {
        if turn != self.computed_turn {
            return None;
        }
        self.computed.get(key).copied()
    }

    pub fn memoize(&mut self, turn: u32, key: OutcomeKey, range: DamageRange) {
        if turn != self.computed_turn {
            self.computed.clear();
            self.computed_turn = turn;
        }
        self.computed.insert(key, range);
    }
}

/// Everything one match owns: its memory and its random source.
///
/// Passed by `&mut` into every engine call for that match; nothing else
/// holds onto it.
#[derive(Debug)]
pub struct MatchSession {
    match_id: MatchId,
    pub memory: MatchMemory,
    pub rng: StdRng,

    /// Most recent move seen in the log, waiting to be paired with its outcome
    pub(crate) last_move: Option<(RosterSlot, String)>,
}

impl MatchSession {
    pub fn new(match_id: impl Into<MatchId>) -> Self {
        Self {
            match_id: match_id.into(),
            memory: MatchMemory::new(),
            rng: StdRng::from_entropy(),
            last_move: None,
        }
    }

    /// Deterministic random choices, for tests and replays
    pub fn with_seed(match_id: impl Into<MatchId>, seed: u64) -> Self {
        Self {
            match_id: match_id.into(),
            memory: MatchMemory::new(),
            rng: StdRng::seed_from_u64(seed),
            last_move: None,
        }
    }

    pub fn match_id(&self) -> &MatchId {
        &self.match_id
    }
}
