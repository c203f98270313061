//! Static per-generation game data
//!
//! The [`Dex`] is loaded once at process start from Showdown-shaped JSON and
//! shared read-only (usually behind an `Arc`) by every match:
//!
//! ```json
//! {
//!   "typechart": { "Water": { "Electric": 2.0, "Fire": 0.5 } },
//!   "moves":     { "thunderbolt": { "name": "Thunderbolt", "type": "Electric",
//!                                   "category": "Special", "basePower": 90, "accuracy": 100 } },
//!   "learnsets": { "pikachu": { "learnset": { "thunderbolt": ["9M"] } } },
//!   "pokedex":   { "pikachu": { "name": "Pikachu", "types": ["Electric"],
//!                               "baseStats": { "hp": 35, "atk": 55, "def": 40,
//!                                              "spa": 50, "spd": 50, "spe": 90 } } }
//! }
//! ```
//!
//! `typechart` is keyed defending type first. When it is absent the standard
//! Gen 6+ chart is used. Entries that reference unknown types are skipped.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::types::{BaseStats, Move, MoveCategory, SideCondition, Status, Type, TypeChart};

#[derive(Error, Debug)]
pub enum DexError {
    #[error("Invalid dex data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read dex file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Pokedex entry for one species
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesData {
    pub name: String,
    pub types: Vec<Type>,
    pub base_stats: BaseStats,
    pub base_species: Option<String>,
}

/// Read-only game data for one generation
#[derive(Debug, Clone, Default)]
pub struct Dex {
    type_chart: TypeChart,
    moves: HashMap<String, Move>,
    learnsets: HashMap<String, HashSet<String>>,
    species: HashMap<String, SpeciesData>,
}

#[derive(Deserialize)]
struct RawDex {
    #[serde(default)]
    typechart: Option<HashMap<String, HashMap<String, f32>>>,
    #[serde(default)]
    moves: HashMap<String, RawMove>,
    #[serde(default)]
    learnsets: HashMap<String, RawLearnset>,
    #[serde(default)]
    pokedex: HashMap<String, RawSpecies>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAccuracy {
    Always(bool),
    Percent(u8),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMove {
    name: String,
    #[serde(rename = "type")]
    move_type: String,
    category: MoveCategory,
    #[serde(default)]
    base_power: u32,
    #[serde(default)]
    accuracy: Option<RawAccuracy>,
    #[serde(default)]
    priority: i8,
    #[serde(default)]
    heal: Option<[u32; 2]>,
    #[serde(default)]
    side_condition: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    flags: HashMap<String, u8>,
}

#[derive(Deserialize)]
struct RawLearnset {
    #[serde(default)]
    learnset: HashMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSpecies {
    name: String,
    types: Vec<String>,
    base_stats: BaseStats,
    #[serde(default)]
    base_species: Option<String>,
}

impl Dex {
    /// Empty dex with the standard type chart
    pub fn new() -> Self {
        Self {
            type_chart: TypeChart::standard(),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DexError> {
        let raw: RawDex = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, DexError> {
        let raw: RawDex = serde_json::from_value(value)?;
        Ok(Self::from_raw(raw))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DexError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn from_raw(raw: RawDex) -> Self {
        let type_chart = match raw.typechart {
            Some(entries) => {
                let mut chart = TypeChart::new();
                for (defending, row) in entries {
                    let Some(defending) = Type::from_protocol(&defending) else {
                        tracing::debug!(defending = %defending, "Skipping unknown defending type");
                        continue;
                    };
                    for (attacking, multiplier) in row {
                        if let Some(attacking) = Type::from_protocol(&attacking) {
                            chart.set(defending, attacking, multiplier);
                        }
                    }
                }
                chart
            }
            None => TypeChart::standard(),
        };

        let moves = raw
            .moves
            .into_iter()
            .filter_map(|(id, data)| {
                let mv = convert_move(&id, data);
                if mv.is_none() {
                    tracing::debug!(move_id = %id, "Skipping move with unknown type");
                }
                mv.map(|mv| (id, mv))
            })
            .collect();

        let learnsets = raw
            .learnsets
            .into_iter()
            .map(|(species, data)| (species, data.learnset.into_keys().collect()))
            .collect();

        let species = raw
            .pokedex
            .into_iter()
            .filter_map(|(id, data)| {
                let types: Vec<Type> = data.types.iter().filter_map(|t| Type::from_protocol(t)).collect();
                if types.is_empty() {
                    tracing::debug!(species = %id, "Skipping species without known types");
                    return None;
                }
                Some((
                    id,
                    SpeciesData {
                        name: data.name,
                        types,
                        base_stats: data.base_stats,
                        base_species: data.base_species,
                    },
                ))
            })
            .collect();

        Self {
            type_chart,
            moves,
            learnsets,
            species,
        }
    }

    pub fn type_chart(&self) -> &TypeChart {
        &self.type_chart
    }

    /// Look up a move by id
    pub fn get_move(&self, id: &str) -> Option<&Move> {
        self.moves.get(id)
    }

    /// Move ids the species can learn (own learnset only)
    pub fn learnset(&self, species_id: &str) -> Option<&HashSet<String>> {
        self.learnsets.get(species_id)
    }

    pub fn species(&self, species_id: &str) -> Option<&SpeciesData> {
        self.species.get(species_id)
    }

}

fn convert_move(id: &str, data: RawMove) -> Option<Move> {
    let move_type = Type::from_protocol(&data.move_type)?;
    let accuracy = match data.accuracy {
        Some(RawAccuracy::Always(_)) => None,
        Some(RawAccuracy::Percent(p)) => Some(p),
        None => Some(100),
    };

    Some(Move {
        id: id.to_string(),
        name: data.name,
        move_type,
        category: data.category,
        base_power: data.base_power,
        accuracy,
        priority: data.priority,
        heal: data.heal.map(|[num, den]| (num, den)),
        side_condition: data
            .side_condition
            .as_deref()
            .and_then(SideCondition::from_protocol),
        status: data.status.as_deref().and_then(Status::from_protocol),
        delayed: data.flags.get("futuremove").is_some_and(|&f| f > 0),
    })
}
