//! Switch Evaluator: ranks replacements by two-way type matchup

use rand::Rng;
use rand::seq::SliceRandom;
use tactician_battle::{BattleState, Combatant, RosterSlot, to_id};

use crate::action::{Action, random_action};
use crate::config::SwitchConfig;
use crate::error::{EngineError, Result};
use crate::matchup::TypeMatchup;

/// A candidate's roster index and its score against the opponent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    pub index: usize,
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct SwitchEvaluator {
    matchup: TypeMatchup,
    config: SwitchConfig,
}

impl SwitchEvaluator {
    pub fn new(matchup: TypeMatchup, config: SwitchConfig) -> Self {
        Self { matchup, config }
    }

    pub fn matchup(&self) -> &TypeMatchup {
        &self.matchup
    }

    pub fn config(&self) -> &SwitchConfig {
        &self.config
    }

    /// Best first; equal scores keep roster order
    pub fn rank(&self, opponent: &Combatant, candidates: &[(usize, &Combatant)]) -> Vec<Ranked> {
        let mut ranked: Vec<Ranked> = candidates
            .iter()
            .map(|&(index, c)| Ranked {
                index,
                score: self.matchup.two_way(c, opponent),
            })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// Legal switch targets with their roster index, in roster order
    fn candidates<'a>(&self, state: &'a BattleState) -> Result<Vec<(usize, &'a Combatant)>> {
        let mut candidates = state
            .available_switches
            .iter()
            .map(|&index| {
                state
                    .ally
                    .get(index)
                    .map(|c| (index, c))
                    .ok_or(EngineError::UnknownCombatant(RosterSlot::ally(index)))
            })
            .collect::<Result<Vec<_>>>()?;
        candidates.sort_by_key(|&(index, _)| index);
        candidates.dedup_by_key(|&mut (index, _)| index);
        Ok(candidates)
    }

    fn is_protected(&self, combatant: &Combatant) -> bool {
        let species = combatant.species_id();
        self.config
            .protected_species
            .iter()
            .any(|s| to_id(s) == species)
    }

    /// Roster index to switch to, or `None` to stay in
    pub fn evaluate_proactive(
        &self,
        state: &BattleState,
        active: &Combatant,
        opponent: &Combatant,
    ) -> Result<Option<usize>> {
        let candidates = self.candidates(state)?;
        if candidates.is_empty() {
            return Ok(None);
        }

        let current = self.matchup.two_way(active, opponent);
        let ranked = self.rank(opponent, &candidates);
        let Some(&best) = ranked.first() else {
            return Ok(None);
        };

        let mut pick = best;
        if let Some(&second) = ranked.get(1) {
            let protected = state.ally.get(best.index).is_some_and(|c| self.is_protected(c));
            if protected && best.score <= second.score * self.config.protected_margin {
                tracing::debug!(index = best.index, "Holding back protected combatant");
                pick = second;
            }
        }

        if pick.score > current * self.config.stay_margin {
            tracing::debug!(
                index = pick.index,
                score = pick.score,
                current = current,
                "Switching for a better matchup"
            );
            Ok(Some(pick.index))
        } else {
            Ok(None)
        }
    }

    /// Replacement for a fainted or forced-out combatant; always returns a legal action
    pub fn evaluate_forced<R: Rng + ?Sized>(&self, state: &BattleState, rng: &mut R) -> Action {
        let candidates = match self.candidates(state) {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(match_id = %state.match_id, error = %e, "Bad switch list, choosing randomly");
                return random_action(state, rng);
            }
        };
        if candidates.is_empty() {
            tracing::warn!(match_id = %state.match_id, "No switches available, choosing randomly");
            return random_action(state, rng);
        }

        let opponent = state
            .opponent()
            .filter(|c| c.is_alive())
            .or_else(|| state.foe.first_alive());
        let Some(opponent) = opponent else {
            tracing::info!(match_id = %state.match_id, "No opponent visible, switching randomly");
            return candidates
                .choose(rng)
                .map(|&(index, _)| Action::switch(index))
                .unwrap_or_else(|| random_action(state, rng));
        };

        match self.rank(opponent, &candidates).first() {
            Some(best) => Action::switch(best.index),
            None => random_action(state, rng),
        }
    }
}
