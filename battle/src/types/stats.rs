//! Stats, stat stages and species baselines

use serde::{Deserialize, Serialize};

/// A boostable stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
    Accuracy,
    Evasion,
}

impl Stat {
    /// Parse from protocol string ("atk", "spa", ...)
    pub fn from_protocol(s: &str) -> Option<Self> {
        match s {
            "atk" => Some(Stat::Atk),
            "def" => Some(Stat::Def),
            "spa" => Some(Stat::Spa),
            "spd" => Some(Stat::Spd),
            "spe" => Some(Stat::Spe),
            "accuracy" => Some(Stat::Accuracy),
            "evasion" => Some(Stat::Evasion),
            _ => None,
        }
    }
}

/// Stat stages (-6 to +6)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatStages {
    pub atk: i8,
    pub def: i8,
    pub spa: i8,
    pub spd: i8,
    pub spe: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatStages {
    pub const MAX: i8 = 6;
    pub const MIN: i8 = -6;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stat: Stat) -> i8 {
        match stat {
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
            Stat::Accuracy => self.accuracy,
            Stat::Evasion => self.evasion,
        }
    }

    /// Set stage for a stat (clamped to -6..+6)
    pub fn set(&mut self, stat: Stat, value: i8) {
        let clamped = value.clamp(Self::MIN, Self::MAX);
        let slot = match stat {
            Stat::Atk => &mut self.atk,
            Stat::Def => &mut self.def,
            Stat::Spa => &mut self.spa,
            Stat::Spd => &mut self.spd,
            Stat::Spe => &mut self.spe,
            Stat::Accuracy => &mut self.accuracy,
            Stat::Evasion => &mut self.evasion,
        };
        *slot = clamped;
    }

    /// Whether another boost to this stat would have any effect
    pub fn can_raise(&self, stat: Stat) -> bool {
        self.get(stat) < Self::MAX
    }

    /// Multiplier for a battle stat stage: +1 = 1.5x ... +6 = 4x, -6 = 0.25x
    pub fn multiplier(stage: i8) -> f32 {
        let stage = stage.clamp(Self::MIN, Self::MAX) as i32;
        if stage >= 0 {
            (2 + stage) as f32 / 2.0
        } else {
            2.0 / (2 - stage) as f32
        }
    }
}

/// Species baseline stats as found in the pokedex
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

/// Individual stat values; the opponent's are usually unknown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub hp: Option<u32>,
    pub atk: Option<u32>,
    pub def: Option<u32>,
    pub spa: Option<u32>,
    pub spd: Option<u32>,
    pub spe: Option<u32>,
}

impl Stats {
    /// All stats known
    pub fn from_values(hp: u32, atk: u32, def: u32, spa: u32, spd: u32, spe: u32) -> Self {
        Self {
            hp: Some(hp),
            atk: Some(atk),
            def: Some(def),
            spa: Some(spa),
            spd: Some(spd),
            spe: Some(spe),
        }
    }

    /// Value for a battle stat (accuracy and evasion have none)
    pub fn get(&self, stat: Stat) -> Option<u32> {
        match stat {
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
            Stat::Accuracy | Stat::Evasion => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        [self.hp, self.atk, self.def, self.spa, self.spd, self.spe]
            .iter()
            .all(Option::is_some)
    }

    /// Fill every unknown value from the species baseline, returns how many were filled
    pub fn backfill(&mut self, base: &BaseStats) -> usize {
        let pairs = [
            (&mut self.hp, base.hp),
            (&mut self.atk, base.atk),
            (&mut self.def, base.def),
            (&mut self.spa, base.spa),
            (&mut self.spd, base.spd),
            (&mut self.spe, base.spe),
        ];

        let mut filled = 0;
        for (value, baseline) in pairs {
            if value.is_none() {
                *value = Some(baseline);
                filled += 1;
            }
        }
        filled
    }
}
