//! Decision Engine: the per-turn rule cascade and lead selection

use std::sync::Arc;

use rand::seq::SliceRandom;
use tactician_battle::{BattleState, Combatant, Dex, Move};

use crate::action::{Action, LeadChoice, random_action};
use crate::config::{DamageMetric, EngineConfig};
use crate::damage::{DamageCalculator, DamageEstimator};
use crate::error::{EngineError, Result};
use crate::matchup::TypeMatchup;
use crate::memory::{MatchMemory, MatchSession};
use crate::rules::RuleContext;
use crate::switching::SwitchEvaluator;

/// Picks one legal action per turn.
///
/// Stateless between calls: everything that must persist lives in the
/// [`MatchSession`] passed in. One engine can serve any number of matches.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: EngineConfig,
    switcher: SwitchEvaluator,
    estimator: DamageEstimator,
}

impl DecisionEngine {
    pub fn new(dex: Arc<Dex>, calculator: Arc<dyn DamageCalculator>, config: EngineConfig) -> Self {
        let switcher = SwitchEvaluator::new(TypeMatchup::new(dex.clone()), config.switching.clone());
        Self {
            config,
            switcher,
            estimator: DamageEstimator::new(dex, calculator),
        }
    }

    /// Engine using the built-in damage formula
    pub fn with_formula(dex: Arc<Dex>, config: EngineConfig) -> Self {
        let switcher = SwitchEvaluator::new(TypeMatchup::new(dex.clone()), config.switching.clone());
        Self {
            config,
            switcher,
            estimator: DamageEstimator::with_formula(dex),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn switcher(&self) -> &SwitchEvaluator {
        &self.switcher
    }

    pub fn estimator(&self) -> &DamageEstimator {
        &self.estimator
    }

    /// Choose this turn's action. Never fails: missing state gives a random
    /// legal action, a failing rule gives the maximum-damage move.
    pub fn choose_action(&self, state: &BattleState, session: &mut MatchSession) -> Action {
        if state.force_switch {
            return self.switcher.evaluate_forced(state, &mut session.rng);
        }

        let (Some(active), Some(opponent)) = (state.active(), state.opponent()) else {
            tracing::warn!(match_id = %state.match_id, "Missing active combatant, choosing randomly");
            return random_action(state, &mut session.rng);
        };

        match self.run_cascade(state, active, opponent, &mut session.memory) {
            Ok(Some(action)) => action,
            Ok(None) => self.max_damage_action(state, session),
            Err(e) => {
                tracing::warn!(match_id = %state.match_id, error = %e, "Cascade failed, using max damage");
                self.max_damage_action(state, session)
            }
        }
    }

    fn run_cascade(
        &self,
        state: &BattleState,
        active: &Combatant,
        opponent: &Combatant,
        memory: &mut MatchMemory,
    ) -> Result<Option<Action>> {
        let mut ctx = RuleContext {
            state,
            active,
            opponent,
            switcher: &self.switcher,
            memory,
        };

        for rule in &self.config.cascade {
            let Some(action) = rule.evaluate(&mut ctx)? else {
                continue;
            };
            if !action.is_legal(state) {
                return Err(EngineError::IllegalAction {
                    rule: rule.name(),
                    action,
                });
            }
            tracing::debug!(match_id = %state.match_id, rule = rule.name(), action = %action, "Rule accepted");
            return Ok(Some(action));
        }
        Ok(None)
    }

    /// Available moves scored against the opponent, best first (stable)
    pub fn rank_moves<'a>(&self, state: &'a BattleState, memory: &mut MatchMemory) -> Result<Vec<(&'a Move, f32)>> {
        let active = state.active().ok_or(EngineError::NoActive)?;
        let opponent = state.opponent().ok_or(EngineError::NoOpponent)?;

        let mut ranked: Vec<(&Move, f32)> = state
            .available_moves
            .iter()
            .map(|mv| {
                let range = self.estimator.estimate(state, active.slot, opponent.slot, mv, memory);
                let score = match self.config.fallback.metric {
                    DamageMetric::Average => range.average(),
                    DamageMetric::Maximum => range.max,
                };
                (mv, score)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(ranked)
    }

    /// Highest-damage move, holding back a delayed-damage move still on cooldown
    pub fn max_damage_action(&self, state: &BattleState, session: &mut MatchSession) -> Action {
        if state.force_switch {
            return self.switcher.evaluate_forced(state, &mut session.rng);
        }

        let ranked = match self.rank_moves(state, &mut session.memory) {
            Ok(ranked) => ranked,
            Err(e) => {
                tracing::warn!(match_id = %state.match_id, error = %e, "Cannot rank moves, choosing randomly");
                return random_action(state, &mut session.rng);
            }
        };
        let Some(&(mut best, _)) = ranked.first() else {
            tracing::warn!(match_id = %state.match_id, "No attacking move available, choosing randomly");
            return random_action(state, &mut session.rng);
        };

        let memory = &mut session.memory;
        if best.delayed && !memory.delayed_ready(state.turn, self.config.fallback.delayed_cooldown) {
            if let Some(&(next, _)) = ranked.get(1) {
                tracing::debug!(move_id = %best.id, "Delayed move on cooldown");
                best = next;
            }
        }
        if best.delayed {
            memory.record_delayed(state.turn);
        }

        Action::use_move(best.id.clone())
    }

    /// Lead selection: a forced replacement against the first listed opposing combatant
    pub fn choose_lead(&self, preview: &BattleState, session: &mut MatchSession) -> LeadChoice {
        let team_size = preview.ally.roster.len();
        let candidates: Vec<(usize, &Combatant)> = preview
            .ally
            .roster
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive())
            .collect();

        let Some(opponent) = preview.foe.first_alive() else {
            tracing::info!(match_id = %preview.match_id, "No opposing team visible, random lead");
            return match candidates.choose(&mut session.rng) {
                Some(&(index, _)) => LeadChoice::with_lead(index, team_size),
                None => LeadChoice::in_order(team_size),
            };
        };

        let lead = match self.switcher.rank(opponent, &candidates).first() {
            Some(best) => LeadChoice::with_lead(best.index, team_size),
            None => LeadChoice::in_order(team_size),
        };
        tracing::info!(match_id = %preview.match_id, lead = ?lead.lead(), "Chose lead");
        lead
    }
}
