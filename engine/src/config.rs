//! Engine configuration
//!
//! Engine variants differ only in data: the ordered rule cascade plus a few
//! tuning constants. Everything has a default, so a config file only needs the
//! fields it changes:
//!
//! ```json
//! {
//!   "cascade": [
//!     { "kind": "recovery", "preferred": ["recover"] },
//!     { "kind": "hazards" }
//!   ],
//!   "fallback": { "metric": "maximum" }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::{BoostRule, DebuffRule, HazardLayer, HazardRule, RecoveryRule, Rule, StatusRule, SweepRule};
use tactician_battle::SideCondition;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{name} must be a positive number, got {value}")]
    InvalidMargin { name: &'static str, value: f32 },
}

/// Switch Evaluator tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchConfig {
    /// A replacement must beat the active matchup by this factor
    pub stay_margin: f32,

    /// Species ids only picked when clearly better than the runner-up
    pub protected_species: Vec<String>,

    /// How much a protected species must beat the runner-up by
    pub protected_margin: f32,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            stay_margin: 1.5,
            protected_species: vec!["gholdengo".to_string()],
            protected_margin: 1.2,
        }
    }
}

/// How the fallback ranks moves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageMetric {
    #[default]
    Average,
    Maximum,
}

/// Maximum-damage fallback tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub metric: DamageMetric,

    /// Turns to wait before picking a delayed-damage move again
    pub delayed_cooldown: u32,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            metric: DamageMetric::Average,
            delayed_cooldown: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rules in priority order, first match wins
    pub cascade: Vec<Rule>,
    pub switching: SwitchConfig,
    pub fallback: FallbackConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::expert()
    }
}

impl EngineConfig {
    /// Full cascade: switch, recover, hazards, knock off, spin, toxic, setup
    pub fn expert() -> Self {
        Self {
            cascade: vec![
                Rule::ProactiveSwitch,
                Rule::Recovery(RecoveryRule::default()),
                Rule::Hazards(HazardRule::default()),
                Rule::OneTimeDebuff(DebuffRule::default()),
                Rule::ClearHazards(SweepRule::default()),
                Rule::PersistentStatus(StatusRule::default()),
                Rule::SetupBoost(BoostRule::default()),
            ],
            switching: SwitchConfig::default(),
            fallback: FallbackConfig::default(),
        }
    }

    /// Hazard stacker: recover, then rocks, toxic spikes and spikes, then hit hard
    pub fn hazard_stack() -> Self {
        Self {
            cascade: vec![
                Rule::Recovery(RecoveryRule {
                    preferred: vec!["recover".to_string()],
                    detect_heal: false,
                    ..RecoveryRule::default()
                }),
                Rule::Hazards(HazardRule {
                    layers: vec![
                        HazardLayer::new("stealthrock", SideCondition::StealthRock, 1),
                        HazardLayer::new("toxicspikes", SideCondition::ToxicSpikes, 2),
                        HazardLayer::new("spikes", SideCondition::Spikes, 3),
                    ],
                }),
            ],
            switching: SwitchConfig::default(),
            fallback: FallbackConfig {
                metric: DamageMetric::Maximum,
                ..FallbackConfig::default()
            },
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validated()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Reject unusable margins and clamp hazard maxima to the game's stacking limits
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        check_margin("stay_margin", self.switching.stay_margin)?;
        check_margin("protected_margin", self.switching.protected_margin)?;

        for rule in &mut self.cascade {
            if let Rule::Hazards(hazards) = rule {
                hazards.clamp_to_game_limits();
            }
        }
        Ok(self)
    }
}

fn check_margin(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidMargin { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expert_is_default() {
        let config = EngineConfig::default();
        assert_eq!(config, EngineConfig::expert());
        assert_eq!(config.cascade.len(), 7);
        assert_eq!(config.cascade[0], Rule::ProactiveSwitch);
        assert_eq!(config.switching.stay_margin, 1.5);
        assert_eq!(config.switching.protected_margin, 1.2);
        assert_eq!(config.fallback.delayed_cooldown, 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(
            r#"{ "cascade": [ { "kind": "recovery", "preferred": ["roost"] } ], "fallback": { "metric": "maximum" } }"#,
        )
        .unwrap();

        assert_eq!(config.cascade.len(), 1);
        match &config.cascade[0] {
            Rule::Recovery(rule) => {
                assert_eq!(rule.preferred, vec!["roost".to_string()]);
                assert_eq!(rule.threshold, 0.5);
            }
            other => panic!("Expected recovery rule, got {:?}", other),
        }
        assert_eq!(config.fallback.metric, DamageMetric::Maximum);
        assert_eq!(config.fallback.delayed_cooldown, 3);
        assert_eq!(config.switching, SwitchConfig::default());
    }

    #[test]
    fn test_hazard_maxima_clamped() {
        let config = EngineConfig::from_json(
            r#"{ "cascade": [ { "kind": "hazards", "layers": [
                { "move_id": "spikes", "condition": "spikes", "max_layers": 5 },
                { "move_id": "stealthrock", "condition": "stealthrock", "max_layers": 1 }
            ] } ] }"#,
        )
        .unwrap();

        let Rule::Hazards(hazards) = &config.cascade[0] else {
            panic!("Expected hazard rule");
        };
        assert_eq!(hazards.layers[0].max_layers, 3);
        assert_eq!(hazards.layers[1].max_layers, 1);
    }

    #[test]
    fn test_invalid_margin() {
        let err = EngineConfig::from_json(r#"{ "switching": { "stay_margin": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMargin { name: "stay_margin", .. }));

        assert!(matches!(EngineConfig::from_json("[1, 2]"), Err(ConfigError::Json(_))));
        assert!(matches!(EngineConfig::load("/nonexistent/engine.json"), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_round_trips_through_json() {
        let config = EngineConfig::hazard_stack();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }
}
