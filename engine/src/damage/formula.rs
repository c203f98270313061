//! Built-in damage formula
//!
//! `floor(floor(floor(2 * level / 5 + 2) * power * attack / defense) / 50) + 2`,
//! then STAB, type effectiveness, burn and the 85..=100 random roll. Items,
//! abilities, weather and crits are not modelled.

use std::sync::Arc;

use tactician_battle::{BattleState, Dex, Move, MoveCategory, RosterSlot, Stat, StatStages, Status};

use super::{CalcError, DamageCalculator, DamageRange};

const STAB: f32 = 1.5;
const MIN_ROLL: f32 = 0.85;

/// Standard damage formula over the snapshot's stats and boosts
#[derive(Debug, Clone)]
pub struct FormulaCalculator {
    dex: Arc<Dex>,
}

impl FormulaCalculator {
    pub fn new(dex: Arc<Dex>) -> Self {
        Self { dex }
    }
}

/// Level factor and truncation as done in game
pub fn base_damage(level: u32, power: u32, attack: u32, defense: u32) -> u32 {
    if defense == 0 {
        return 0;
    }
    let level_factor = 2 * level / 5 + 2;
    level_factor * power * attack / defense / 50 + 2
}

fn boosted(raw: u32, stage: i8) -> u32 {
    (raw as f32 * StatStages::multiplier(stage)).floor() as u32
}

impl DamageCalculator for FormulaCalculator {
    fn calculate(
        &self,
        attacker: RosterSlot,
        defender: RosterSlot,
        mv: &Move,
        state: &BattleState,
    ) -> Result<DamageRange, CalcError> {
        if mv.is_status() || mv.base_power == 0 {
            return Ok(DamageRange::ZERO);
        }

        let atk = state
            .combatant(attacker)
            .ok_or(CalcError::UnknownCombatant(attacker))?;
        let def = state
            .combatant(defender)
            .ok_or(CalcError::UnknownCombatant(defender))?;

        let (offense, defense) = match mv.category {
            MoveCategory::Physical => (Stat::Atk, Stat::Def),
            _ => (Stat::Spa, Stat::Spd),
        };
        let attack = atk.stats.get(offense).ok_or(CalcError::MissingStat {
            slot: attacker,
            stat: "attack",
        })?;
        let defense_value = def.stats.get(defense).ok_or(CalcError::MissingStat {
            slot: defender,
            stat: "defense",
        })?;

        let base = base_damage(
            atk.level as u32,
            mv.base_power,
            boosted(attack, atk.boosts.get(offense)),
            boosted(defense_value, def.boosts.get(defense)),
        ) as f32;

        let mut modifier = self.dex.type_chart().against(mv.move_type, &def.types);
        if atk.types.contains(&mv.move_type) {
            modifier *= STAB;
        }
        if mv.category == MoveCategory::Physical && atk.status == Some(Status::Burn) {
            modifier *= 0.5;
        }

        let max = (base * modifier).floor();
        let min = (base * MIN_ROLL * modifier).floor();
        Ok(DamageRange::new(min, max))
    }
}
