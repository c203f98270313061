#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use tactician_battle::{BattleState, Combatant, Dex, Move, Player, RosterSlot, SideState, Type};
use tactician_engine::{CalcError, DamageCalculator, DamageRange};

pub fn dex() -> Arc<Dex> {
    let dex = Dex::from_value(json!({
        "moves": {
            "recover": { "name": "Recover", "type": "Normal", "category": "Status", "accuracy": true, "heal": [1, 2] },
            "slackoff": { "name": "Slack Off", "type": "Normal", "category": "Status", "accuracy": true, "heal": [1, 2] },
            "stealthrock": { "name": "Stealth Rock", "type": "Rock", "category": "Status", "accuracy": true, "sideCondition": "stealthrock" },
            "spikes": { "name": "Spikes", "type": "Ground", "category": "Status", "accuracy": true, "sideCondition": "spikes" },
            "toxicspikes": { "name": "Toxic Spikes", "type": "Poison", "category": "Status", "accuracy": true, "sideCondition": "toxicspikes" },
            "knockoff": { "name": "Knock Off", "type": "Dark", "category": "Physical", "basePower": 65 },
            "rapidspin": { "name": "Rapid Spin", "type": "Normal", "category": "Physical", "basePower": 50 },
            "toxic": { "name": "Toxic", "type": "Poison", "category": "Status", "accuracy": 90, "status": "tox" },
            "nastyplot": { "name": "Nasty Plot", "type": "Dark", "category": "Status", "accuracy": true },
            "thunderbolt": { "name": "Thunderbolt", "type": "Electric", "category": "Special", "basePower": 90 },
            "surf": { "name": "Surf", "type": "Water", "category": "Special", "basePower": 90 },
            "earthquake": { "name": "Earthquake", "type": "Ground", "category": "Physical", "basePower": 100 },
            "tackle": { "name": "Tackle", "type": "Normal", "category": "Physical", "basePower": 40 },
            "icebeam": { "name": "Ice Beam", "type": "Ice", "category": "Special", "basePower": 90 },
            "futuresight": { "name": "Future Sight", "type": "Psychic", "category": "Special", "basePower": 120, "flags": { "futuremove": 1 } }
        },
        "learnsets": {
            "dugtrio": { "learnset": { "earthquake": ["9M"], "tackle": ["9L1"] } },
            "pikachu": { "learnset": { "thunderbolt": ["9M"], "surf": ["9S"] } }
        },
        "pokedex": {
            "dugtrio": { "name": "Dugtrio", "types": ["Ground"],
                         "baseStats": { "hp": 35, "atk": 100, "def": 50, "spa": 50, "spd": 70, "spe": 120 } },
            "pikachu": { "name": "Pikachu", "types": ["Electric"],
                         "baseStats": { "hp": 35, "atk": 55, "def": 40, "spa": 50, "spd": 50, "spe": 90 } }
        }
    }))
    .expect("fixture dex is valid");
    Arc::new(dex)
}

/// Available move taken from the fixture dex
pub fn mv(id: &str) -> Move {
    dex().get_move(id).cloned().unwrap_or_else(|| panic!("fixture has no move {id}"))
}

pub fn combatant(slot: RosterSlot, species: &str, types: Vec<Type>, moves: &[&str]) -> Combatant {
    let mut c = Combatant::new(slot, species, types);
    c.moves = moves.iter().map(|m| m.to_string()).collect();
    c
}

/// Pikachu (active) and Snorlax against an active Dugtrio
pub fn battle(match_id: &str) -> BattleState {
    let mut state = BattleState::new(match_id, Player::P1);
    state.turn = 1;
    state.ally = SideState::new(vec![
        combatant(RosterSlot::ally(0), "Pikachu", vec![Type::Electric], &["thunderbolt", "surf"]),
        combatant(RosterSlot::ally(1), "Snorlax", vec![Type::Normal], &["tackle"]),
    ]);
    state.ally.active = Some(0);
    state.foe = SideState::new(vec![
        combatant(RosterSlot::foe(0), "Dugtrio", vec![Type::Ground], &[]),
        combatant(RosterSlot::foe(1), "Gengar", vec![Type::Ghost, Type::Poison], &[]),
    ]);
    state.foe.active = Some(0);
    state
}

/// Fixed damage per move id, counting every call
#[derive(Default)]
pub struct FixedDamage {
    damage: HashMap<String, DamageRange>,
    calls: AtomicUsize,
}

impl FixedDamage {
    pub fn new(entries: &[(&str, f32, f32)]) -> Self {
        Self {
            damage: entries
                .iter()
                .map(|&(id, min, max)| (id.to_string(), DamageRange::new(min, max)))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DamageCalculator for FixedDamage {
    fn calculate(
        &self,
        _attacker: RosterSlot,
        _defender: RosterSlot,
        mv: &Move,
        _state: &BattleState,
    ) -> Result<DamageRange, CalcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.damage.get(&mv.id).copied().unwrap_or_default())
    }
}

pub struct FailingCalculator;

impl DamageCalculator for FailingCalculator {
    fn calculate(&self, _: RosterSlot, _: RosterSlot, _: &Move, _: &BattleState) -> Result<DamageRange, CalcError> {
        Err(CalcError::Failed("no simulator".to_string()))
    }
}
