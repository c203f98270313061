//! Damage estimation
//!
//! [`DamageEstimator`] wraps a [`DamageCalculator`] with the per-match
//! outcome cache kept in [`MatchMemory`]:
//!
//! 1. unknown stats are backfilled from species baselines
//! 2. an observed outcome (e.g. an immunity) is returned verbatim
//! 3. a range computed earlier this turn is reused
//! 4. otherwise the calculator runs; failures degrade to `(0, 0)`

mod formula;

pub use formula::FormulaCalculator;

use std::borrow::Cow;
use std::sync::Arc;

use tactician_battle::{BattleState, Dex, Move, RosterSlot};
use thiserror::Error;

use crate::memory::{MatchMemory, OutcomeKey};

/// Expected damage for one move use, `0 <= min <= max`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageRange {
    pub min: f32,
    pub max: f32,
}

impl DamageRange {
    pub const ZERO: DamageRange = DamageRange { min: 0.0, max: 0.0 };

    /// Negative bounds are clamped to zero and the pair is ordered
    pub fn new(min: f32, max: f32) -> Self {
        let min = min.max(0.0);
        let max = max.max(0.0);
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Both bounds equal
    pub fn exact(value: f32) -> Self {
        Self::new(value, value)
    }

    pub fn average(&self) -> f32 {
        (self.min + self.max) / 2.0
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum CalcError {
    #[error("Unknown combatant {0}")]
    UnknownCombatant(RosterSlot),

    #[error("Missing {stat} for {slot}")]
    MissingStat { slot: RosterSlot, stat: &'static str },

    #[error("Calculation failed: {0}")]
    Failed(String),
}

/// Leaf damage calculation, usually backed by a simulator
pub trait DamageCalculator: Send + Sync {
    fn calculate(
        &self,
        attacker: RosterSlot,
        defender: RosterSlot,
        mv: &Move,
        state: &BattleState,
    ) -> Result<DamageRange, CalcError>;
}

/// Calculator front-end with stat backfill and caching
#[derive(Clone)]
pub struct DamageEstimator {
    dex: Arc<Dex>,
    calculator: Arc<dyn DamageCalculator>,
}

impl std::fmt::Debug for DamageEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DamageEstimator").finish_non_exhaustive()
    }
}

impl DamageEstimator {
    pub fn new(dex: Arc<Dex>, calculator: Arc<dyn DamageCalculator>) -> Self {
        Self { dex, calculator }
    }

    /// Estimator backed by the built-in [`FormulaCalculator`]
    pub fn with_formula(dex: Arc<Dex>) -> Self {
        let calculator = Arc::new(FormulaCalculator::new(dex.clone()));
        Self { dex, calculator }
    }

    pub fn estimate(
        &self,
        state: &BattleState,
        attacker: RosterSlot,
        defender: RosterSlot,
        mv: &Move,
        memory: &mut MatchMemory,
    ) -> DamageRange {
        let state = self.backfilled(state, &[attacker, defender]);
        let key = OutcomeKey::new(attacker, defender, mv.id.clone());

        if let Some(observed) = memory.observed(&key) {
            return DamageRange::exact(observed);
        }
        if let Some(range) = memory.memoized(state.turn, &key) {
            return range;
        }

        match self.calculator.calculate(attacker, defender, mv, &state) {
            Ok(range) => {
                let range = DamageRange::new(range.min, range.max);
                memory.memoize(state.turn, key, range);
                range
            }
            Err(e) => {
                tracing::error!(
                    attacker = %attacker,
                    defender = %defender,
                    move_id = %mv.id,
                    error = %e,
                    "Damage calculation failed"
                );
                DamageRange::ZERO
            }
        }
    }

    /// Copy of the snapshot with unknown stats filled from species baselines
    fn backfilled<'a>(&self, state: &'a BattleState, slots: &[RosterSlot]) -> Cow<'a, BattleState> {
        let incomplete = slots
            .iter()
            .any(|&slot| state.combatant(slot).is_some_and(|c| !c.stats.is_complete()));
        if !incomplete {
            return Cow::Borrowed(state);
        }

        let mut owned = state.clone();
        for &slot in slots {
            let Some(combatant) = owned.combatant_mut(slot) else {
                continue;
            };
            if combatant.stats.is_complete() {
                continue;
            }
            let species = combatant.species_id();
            let base = combatant
                .base_stats
                .or_else(|| self.dex.species(&species).map(|s| s.base_stats));
            match base {
                Some(base) => {
                    let filled = combatant.stats.backfill(&base);
                    tracing::debug!(slot = %slot, filled = filled, "Backfilled stats from baseline");
                }
                None => tracing::warn!(slot = %slot, species = %species, "No baseline stats to backfill"),
            }
        }
        Cow::Owned(owned)
    }
}
