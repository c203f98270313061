//! Cascade rules
//!
//! Each [`Rule`] looks at the turn and either proposes an action or passes.
//! The engine runs them in configured order and takes the first proposal.

use serde::{Deserialize, Serialize};
use tactician_battle::{BattleState, Combatant, SideCondition, Stat, Status, to_id};

use crate::action::Action;
use crate::error::Result;
use crate::memory::MatchMemory;
use crate::switching::SwitchEvaluator;

/// What a rule gets to look at (and the memory it may update)
pub struct RuleContext<'a> {
    pub state: &'a BattleState,
    pub active: &'a Combatant,
    pub opponent: &'a Combatant,
    pub switcher: &'a SwitchEvaluator,
    pub memory: &'a mut MatchMemory,
}

impl RuleContext<'_> {
    /// Use the move if it is currently legal
    fn try_move(&self, id: &str) -> Option<Action> {
        self.state.can_use_move(id).then(|| Action::use_move(id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// Switch out when a bench member has a clearly better matchup
    ProactiveSwitch,
    Recovery(RecoveryRule),
    Hazards(HazardRule),
    OneTimeDebuff(DebuffRule),
    ClearHazards(SweepRule),
    PersistentStatus(StatusRule),
    SetupBoost(BoostRule),
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::ProactiveSwitch => "proactive_switch",
            Rule::Recovery(_) => "recovery",
            Rule::Hazards(_) => "hazards",
            Rule::OneTimeDebuff(_) => "one_time_debuff",
            Rule::ClearHazards(_) => "clear_hazards",
            Rule::PersistentStatus(_) => "persistent_status",
            Rule::SetupBoost(_) => "setup_boost",
        }
    }

    pub fn evaluate(&self, ctx: &mut RuleContext<'_>) -> Result<Option<Action>> {
        match self {
            Rule::ProactiveSwitch => Ok(ctx
                .switcher
                .evaluate_proactive(ctx.state, ctx.active, ctx.opponent)?
                .map(Action::switch)),
            Rule::Recovery(rule) => Ok(rule.evaluate(ctx)),
            Rule::Hazards(rule) => Ok(rule.evaluate(ctx)),
            Rule::OneTimeDebuff(rule) => Ok(rule.evaluate(ctx)),
            Rule::ClearHazards(rule) => Ok(rule.evaluate(ctx)),
            Rule::PersistentStatus(rule) => Ok(rule.evaluate(ctx)),
            Rule::SetupBoost(rule) => Ok(rule.evaluate(ctx)),
        }
    }
}

/// Heal when below the threshold, unless healing is blocked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryRule {
    /// HP fraction below which healing is considered
    pub threshold: f32,

    /// Recovery moves in order of preference
    pub preferred: Vec<String>,

    /// Also accept any other move with a heal fraction
    pub detect_heal: bool,
}

impl Default for RecoveryRule {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            preferred: vec![
                "recover".to_string(),
                "slackoff".to_string(),
                "morningsun".to_string(),
            ],
            detect_heal: true,
        }
    }
}

impl RecoveryRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Action> {
        if ctx.active.hp_fraction() >= self.threshold {
            return None;
        }
        if ctx.active.healing_suppressed() {
            tracing::info!(species = %ctx.active.species, "Healing blocked, skipping recovery");
            return None;
        }

        if let Some(action) = self.preferred.iter().find_map(|id| ctx.try_move(id)) {
            return Some(action);
        }
        if !self.detect_heal {
            return None;
        }
        ctx.state
            .available_moves
            .iter()
            .find(|m| m.is_recovery())
            .and_then(|m| ctx.try_move(&m.id))
    }
}

/// One hazard move and how many layers of it to stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardLayer {
    pub move_id: String,
    pub condition: SideCondition,
    pub max_layers: u8,
}

impl HazardLayer {
    pub fn new(move_id: impl Into<String>, condition: SideCondition, max_layers: u8) -> Self {
        Self {
            move_id: move_id.into(),
            condition,
            max_layers,
        }
    }
}

/// Stack entry hazards on the opposing side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardRule {
    /// Checked in order
    pub layers: Vec<HazardLayer>,
}

impl Default for HazardRule {
    fn default() -> Self {
        Self {
            layers: vec![
                HazardLayer::new("stealthrock", SideCondition::StealthRock, 1),
                HazardLayer::new("spikes", SideCondition::Spikes, 3),
                HazardLayer::new("toxicspikes", SideCondition::ToxicSpikes, 2),
            ],
        }
    }
}

impl HazardRule {
    /// Lower any configured maximum above what the game allows, returns how many changed
    pub fn clamp_to_game_limits(&mut self) -> usize {
        let mut clamped = 0;
        for layer in &mut self.layers {
            let limit = layer.condition.max_layers();
            if layer.max_layers > limit {
                tracing::warn!(
                    move_id = %layer.move_id,
                    configured = layer.max_layers,
                    limit = limit,
                    "Hazard maximum above game limit"
                );
                layer.max_layers = limit;
                clamped += 1;
            }
        }
        clamped
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Action> {
        self.layers.iter().find_map(|layer| {
            let limit = layer.max_layers.min(layer.condition.max_layers());
            if ctx.state.foe.layers(layer.condition) >= limit {
                return None;
            }
            ctx.try_move(&layer.move_id)
        })
    }
}

/// Use a move once per opposing combatant per match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebuffRule {
    pub move_id: String,
}

impl Default for DebuffRule {
    fn default() -> Self {
        Self {
            move_id: "knockoff".to_string(),
        }
    }
}

impl DebuffRule {
    fn evaluate(&self, ctx: &mut RuleContext<'_>) -> Option<Action> {
        let target = ctx.opponent.slot;
        if ctx.memory.was_debuffed(target) {
            return None;
        }
        let action = ctx.try_move(&self.move_id)?;
        ctx.memory.record_debuff(target);
        Some(action)
    }
}

/// Clear hazards from our own side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepRule {
    pub moves: Vec<String>,
}

impl Default for SweepRule {
    fn default() -> Self {
        Self {
            moves: vec!["rapidspin".to_string()],
        }
    }
}

impl SweepRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Action> {
        if !ctx.state.ally.has_hazards() {
            return None;
        }
        self.moves.iter().find_map(|id| ctx.try_move(id))
    }
}

/// Inflict a lasting status once per opposing combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusRule {
    pub move_id: String,
    pub status: Status,
}

impl Default for StatusRule {
    fn default() -> Self {
        Self {
            move_id: "toxic".to_string(),
            status: Status::BadPoison,
        }
    }
}

impl StatusRule {
    fn evaluate(&self, ctx: &mut RuleContext<'_>) -> Option<Action> {
        let target = ctx.opponent.slot;
        if ctx.opponent.status == Some(self.status) || ctx.memory.was_poisoned(target) {
            return None;
        }
        let action = ctx.try_move(&self.move_id)?;
        ctx.memory.record_poison(target);
        Some(action)
    }
}

/// A species-specific setup move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booster {
    pub species: String,
    pub move_id: String,
    pub stat: Stat,
    /// Only set up above this HP fraction
    #[serde(default = "default_boost_hp")]
    pub min_hp: f32,
}

fn default_boost_hp() -> f32 {
    0.5
}

impl Booster {
    pub fn new(species: impl Into<String>, move_id: impl Into<String>, stat: Stat) -> Self {
        Self {
            species: species.into(),
            move_id: move_id.into(),
            stat,
            min_hp: default_boost_hp(),
        }
    }
}

/// Boost the offensive stat of named sweepers while healthy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostRule {
    pub boosters: Vec<Booster>,
}

impl Default for BoostRule {
    fn default() -> Self {
        Self {
            boosters: vec![
                Booster::new("gholdengo", "nastyplot", Stat::Spa),
                Booster::new("necrozmaduskmane", "swordsdance", Stat::Atk),
            ],
        }
    }
}

impl BoostRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<Action> {
        let species = ctx.active.species_id();
        self.boosters
            .iter()
            .filter(|b| to_id(&b.species) == species)
            .find_map(|b| {
                let ready = ctx.active.boosts.can_raise(b.stat) && ctx.active.hp_fraction() > b.min_hp;
                if ready { ctx.try_move(&b.move_id) } else { None }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tactician_battle::{Dex, Effect, Move, MoveCategory, Player, RosterSlot, SideState, Type};

    use crate::config::SwitchConfig;
    use crate::matchup::TypeMatchup;

    fn create_test_state(moves: Vec<Move>) -> BattleState {
        let mut state = BattleState::new("battle-rules", Player::P1);
        state.ally = SideState::new(vec![
            Combatant::new(RosterSlot::ally(0), "Gholdengo", vec![Type::Steel, Type::Ghost]),
            Combatant::new(RosterSlot::ally(1), "Toxapex", vec![Type::Poison, Type::Water]),
        ]);
        state.ally.active = Some(0);
        state.foe = SideState::new(vec![
            Combatant::new(RosterSlot::foe(0), "Great Tusk", vec![Type::Ground, Type::Fighting]),
            Combatant::new(RosterSlot::foe(1), "Kingambit", vec![Type::Dark, Type::Steel]),
        ]);
        state.foe.active = Some(0);
        state.available_moves = moves;
        state
    }

    fn evaluate(rule: &Rule, state: &BattleState, memory: &mut MatchMemory) -> Option<Action> {
        let switcher = SwitchEvaluator::new(TypeMatchup::new(Arc::new(Dex::new())), SwitchConfig::default());
        let mut ctx = RuleContext {
            state,
            active: state.active().unwrap(),
            opponent: state.opponent().unwrap(),
            switcher: &switcher,
            memory,
        };
        rule.evaluate(&mut ctx).unwrap()
    }

    fn status_move(name: &str) -> Move {
        Move::new(name, Type::Normal, MoveCategory::Status, 0)
    }

    #[test]
    fn test_recovery_threshold() {
        let rule = Rule::Recovery(RecoveryRule::default());
        let mut state = create_test_state(vec![status_move("Recover")]);
        let mut memory = MatchMemory::new();

        state.ally.roster[0].hp_current = 50;
        assert_eq!(evaluate(&rule, &state, &mut memory), None);

        state.ally.roster[0].hp_current = 40;
        assert_eq!(evaluate(&rule, &state, &mut memory), Some(Action::use_move("recover")));

        state.ally.roster[0].effects.insert(Effect::HealBlock);
        assert_eq!(evaluate(&rule, &state, &mut memory), None);
    }

    #[test]
    fn test_recovery_preference_and_heal_detection() {
        let rule = Rule::Recovery(RecoveryRule::default());
        let mut state = create_test_state(vec![
            status_move("Roost").with_heal(1, 2),
            status_move("Morning Sun"),
            status_move("Slack Off"),
        ]);
        state.ally.roster[0].hp_current = 10;
        let mut memory = MatchMemory::new();
        assert_eq!(evaluate(&rule, &state, &mut memory), Some(Action::use_move("slackoff")));

        state.available_moves = vec![status_move("Roost").with_heal(1, 2)];
        assert_eq!(evaluate(&rule, &state, &mut memory), Some(Action::use_move("roost")));

        let strict = Rule::Recovery(RecoveryRule {
            detect_heal: false,
            ..RecoveryRule::default()
        });
        assert_eq!(evaluate(&strict, &state, &mut memory), None);
    }

    #[test]
    fn test_hazards_respect_layers() {
        let rule = Rule::Hazards(HazardRule::default());
        let mut state = create_test_state(vec![
            status_move("Spikes"),
            status_move("Stealth Rock"),
        ]);
        let mut memory = MatchMemory::new();

        assert_eq!(evaluate(&rule, &state, &mut memory), Some(Action::use_move("stealthrock")));

        state.foe.add_layer(SideCondition::StealthRock);
        assert_eq!(evaluate(&rule, &state, &mut memory), Some(Action::use_move("spikes")));

        for _ in 0..3 {
            state.foe.add_layer(SideCondition::Spikes);
        }
        assert_eq!(evaluate(&rule, &state, &mut memory), None);
    }

    #[test]
    fn test_hazard_maximum_above_limit_is_capped() {
        let rule = Rule::Hazards(HazardRule {
            layers: vec![HazardLayer::new("stealthrock", SideCondition::StealthRock, 4)],
        });
        let mut state = create_test_state(vec![status_move("Stealth Rock")]);
        state.foe.conditions.insert(SideCondition::StealthRock, 1);
        let mut memory = MatchMemory::new();
        assert_eq!(evaluate(&rule, &state, &mut memory), None);
    }

    #[test]
    fn test_debuff_once_per_opponent() {
        let rule = Rule::OneTimeDebuff(DebuffRule::default());
        let mut state = create_test_state(vec![Move::new("Knock Off", Type::Dark, MoveCategory::Physical, 65)]);
        let mut memory = MatchMemory::new();

        assert_eq!(evaluate(&rule, &state, &mut memory), Some(Action::use_move("knockoff")));
        assert!(memory.was_debuffed(RosterSlot::foe(0)));
        assert_eq!(evaluate(&rule, &state, &mut memory), None);

        state.foe.active = Some(1);
        assert_eq!(evaluate(&rule, &state, &mut memory), Some(Action::use_move("knockoff")));
    }

    #[test]
    fn test_clear_hazards_only_when_present() {
        let rule = Rule::ClearHazards(SweepRule::default());
        let mut state = create_test_state(vec![Move::new("Rapid Spin", Type::Normal, MoveCategory::Physical, 50)]);
        let mut memory = MatchMemory::new();

        assert_eq!(evaluate(&rule, &state, &mut memory), None);
        state.ally.add_layer(SideCondition::Spikes);
        assert_eq!(evaluate(&rule, &state, &mut memory), Some(Action::use_move("rapidspin")));
    }

    #[test]
    fn test_persistent_status() {
        let rule = Rule::PersistentStatus(StatusRule::default());
        let mut state = create_test_state(vec![status_move("Toxic")]);
        let mut memory = MatchMemory::new();

        state.foe.roster[0].status = Some(Status::BadPoison);
        assert_eq!(evaluate(&rule, &state, &mut memory), None);

        state.foe.roster[0].status = None;
        assert_eq!(evaluate(&rule, &state, &mut memory), Some(Action::use_move("toxic")));
        // cured later, still not retargeted
        assert_eq!(evaluate(&rule, &state, &mut memory), None);
    }

    #[test]
    fn test_setup_boost() {
        let rule = Rule::SetupBoost(BoostRule::default());
        let mut state = create_test_state(vec![status_move("Nasty Plot")]);
        let mut memory = MatchMemory::new();

        assert_eq!(evaluate(&rule, &state, &mut memory), Some(Action::use_move("nastyplot")));

        state.ally.roster[0].boosts.set(Stat::Spa, 6);
        assert_eq!(evaluate(&rule, &state, &mut memory), None);

        state.ally.roster[0].boosts.set(Stat::Spa, 2);
        state.ally.roster[0].hp_current = 50;
        assert_eq!(evaluate(&rule, &state, &mut memory), None);

        state.ally.roster[0].hp_current = 100;
        state.ally.active = Some(1);
        assert_eq!(evaluate(&rule, &state, &mut memory), None);
    }

    #[test]
    fn test_rule_serde_tags() {
        let rule: Rule = serde_json::from_str(r#"{ "kind": "one_time_debuff", "move_id": "knockoff" }"#).unwrap();
        assert_eq!(rule, Rule::OneTimeDebuff(DebuffRule::default()));
        assert_eq!(rule.name(), "one_time_debuff");

        let rule: Rule = serde_json::from_str(r#"{ "kind": "proactive_switch" }"#).unwrap();
        assert_eq!(rule, Rule::ProactiveSwitch);
    }
}
