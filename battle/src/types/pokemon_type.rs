//! Elemental types and the type effectiveness table

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Pokemon types (18 types as of Gen 6+)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl Type {
    pub const ALL: [Type; 18] = [
        Type::Normal,
        Type::Fire,
        Type::Water,
        Type::Electric,
        Type::Grass,
        Type::Ice,
        Type::Fighting,
        Type::Poison,
        Type::Ground,
        Type::Flying,
        Type::Psychic,
        Type::Bug,
        Type::Rock,
        Type::Ghost,
        Type::Dragon,
        Type::Dark,
        Type::Steel,
        Type::Fairy,
    ];

    /// Parse from a protocol or data-file string (case-insensitive)
    pub fn from_protocol(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Canonical display name
    pub fn as_str(&self) -> &'static str {
        match self {
            Type::Normal => "Normal",
            Type::Fire => "Fire",
            Type::Water => "Water",
            Type::Electric => "Electric",
            Type::Grass => "Grass",
            Type::Ice => "Ice",
            Type::Fighting => "Fighting",
            Type::Poison => "Poison",
            Type::Ground => "Ground",
            Type::Flying => "Flying",
            Type::Psychic => "Psychic",
            Type::Bug => "Bug",
            Type::Rock => "Rock",
            Type::Ghost => "Ghost",
            Type::Dragon => "Dragon",
            Type::Dark => "Dark",
            Type::Steel => "Steel",
            Type::Fairy => "Fairy",
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Type::from_protocol(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown type: {raw}")))
    }
}

/// Type effectiveness lookup: defending type -> attacking type -> multiplier.
///
/// Pairs that are absent are neutral (1.0). The table is built once and never
/// mutated afterwards; share it behind the [`Dex`](crate::Dex) that owns it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeChart {
    defending: HashMap<Type, HashMap<Type, f32>>,
}

impl TypeChart {
    /// Empty chart (everything neutral)
    pub fn new() -> Self {
        Self::default()
    }

    /// The Gen 6+ chart
    pub fn standard() -> Self {
        use Type::*;

        // (attacking, super effective against, resisted by, no effect on)
        #[rustfmt::skip]
        let rows: [(Type, &[Type], &[Type], &[Type]); 18] = [
            (Normal,   &[],                                   &[Rock, Steel],                                           &[Ghost]),
            (Fire,     &[Grass, Ice, Bug, Steel],             &[Fire, Water, Rock, Dragon],                             &[]),
            (Water,    &[Fire, Ground, Rock],                 &[Water, Grass, Dragon],                                  &[]),
            (Electric, &[Water, Flying],                      &[Electric, Grass, Dragon],                               &[Ground]),
            (Grass,    &[Water, Ground, Rock],                &[Fire, Grass, Poison, Flying, Bug, Dragon, Steel],       &[]),
            (Ice,      &[Grass, Ground, Flying, Dragon],      &[Fire, Water, Ice, Steel],                               &[]),
            (Fighting, &[Normal, Ice, Rock, Dark, Steel],     &[Poison, Flying, Psychic, Bug, Fairy],                   &[Ghost]),
            (Poison,   &[Grass, Fairy],                       &[Poison, Ground, Rock, Ghost],                           &[Steel]),
            (Ground,   &[Fire, Electric, Poison, Rock, Steel],&[Grass, Bug],                                            &[Flying]),
            (Flying,   &[Grass, Fighting, Bug],               &[Electric, Rock, Steel],                                 &[]),
            (Psychic,  &[Fighting, Poison],                   &[Psychic, Steel],                                        &[Dark]),
            (Bug,      &[Grass, Psychic, Dark],               &[Fire, Fighting, Poison, Flying, Ghost, Steel, Fairy],   &[]),
            (Rock,     &[Fire, Ice, Flying, Bug],             &[Fighting, Ground, Steel],                               &[]),
            (Ghost,    &[Psychic, Ghost],                     &[Dark],                                                  &[Normal]),
            (Dragon,   &[Dragon],                             &[Steel],                                                 &[Fairy]),
            (Dark,     &[Psychic, Ghost],                     &[Fighting, Dark, Fairy],                                 &[]),
            (Steel,    &[Ice, Rock, Fairy],                   &[Fire, Water, Electric, Steel],                          &[]),
            (Fairy,    &[Fighting, Dragon, Dark],             &[Fire, Poison, Steel],                                   &[]),
        ];

        let mut chart = Self::new();
        for (attacking, strong, weak, none) in rows {
            for &defending in strong {
                chart.set(defending, attacking, 2.0);
            }
            for &defending in weak {
                chart.set(defending, attacking, 0.5);
            }
            for &defending in none {
                chart.set(defending, attacking, 0.0);
            }
        }
        chart
    }

    /// Set the multiplier an attacking type has against a defending type
    pub fn set(&mut self, defending: Type, attacking: Type, multiplier: f32) {
        self.defending
            .entry(defending)
            .or_default()
            .insert(attacking, multiplier);
    }

    /// Multiplier for one attacking type against one defending type (1.0 if absent)
    pub fn multiplier(&self, attacking: Type, defending: Type) -> f32 {
        self.defending
            .get(&defending)
            .and_then(|row| row.get(&attacking))
            .copied()
            .unwrap_or(1.0)
    }

    /// Product of multipliers across all of the defender's types
    pub fn against(&self, attacking: Type, defending: &[Type]) -> f32 {
        defending
            .iter()
            .map(|&d| self.multiplier(attacking, d))
            .product()
    }

    /// Whether no entries have been loaded
    pub fn is_empty(&self) -> bool {
        self.defending.is_empty()
    }
}
