//! Rule-based decision engine for singles battles.
//!
//! Given a [`BattleState`](tactician_battle::BattleState) snapshot the engine
//! returns exactly one legal [`Action`]:
//!
//! ```text
//! forced replacement? ──yes──► SwitchEvaluator (forced mode)
//!        │ no
//!        ▼
//! rule cascade (first proposal wins)
//!   proactive switch → recovery → hazards → one-time debuff
//!   → hazard clearing → persistent status → setup boost
//!        │ nothing / error
//!        ▼
//! maximum-damage fallback (DamageEstimator + MatchMemory cache)
//! ```
//!
//! # Main Types
//!
//! - [`DecisionEngine`] - the cascade, driven by an [`EngineConfig`]
//! - [`MatchSession`] - per-match [`MatchMemory`] and random source
//! - [`MatchRegistry`] - live sessions by match id, closed when the log reports a result
//! - [`DamageEstimator`] - cached front-end over a [`DamageCalculator`]
//! - [`TypeMatchup`] - move-type effectiveness scoring
//! - [`AgentRegistry`] - named agent factories
//!
//! # Example Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tactician_battle::Dex;
//! use tactician_engine::{DecisionEngine, EngineConfig, MatchRegistry, registry};
//!
//! let dex = Arc::new(Dex::load("data/gen9.json")?);
//! let engine = DecisionEngine::with_formula(dex, EngineConfig::expert());
//! let matches = MatchRegistry::new();
//!
//! // team preview
//! let session = matches.open(preview.match_id.clone());
//! let lead = engine.choose_lead(&preview, &mut registry::lock(&session));
//! send(lead.to_choice());
//!
//! // every request
//! let action = engine.choose_action(&state, &mut registry::lock(&session));
//! send(action.to_choice());
//!
//! // every log line
//! matches.observe_log(&state, line)?;
//! ```

pub mod action;
pub mod agent;
pub mod config;
pub mod damage;
pub mod engine;
pub mod error;
pub mod log;
pub mod matchup;
pub mod memory;
pub mod registry;
pub mod rules;
pub mod switching;

pub use action::{Action, LeadChoice, Modifier, random_action};
pub use agent::{Agent, AgentContext, AgentFactory, AgentRegistry, HeuristicAgent, RandomAgent};
pub use config::{ConfigError, DamageMetric, EngineConfig, FallbackConfig, SwitchConfig};
pub use damage::{CalcError, DamageCalculator, DamageEstimator, DamageRange, FormulaCalculator};
pub use engine::DecisionEngine;
pub use error::EngineError;
pub use log::{LogEvent, PokemonRef, parse_log_line};
pub use matchup::{MoveTypes, TypeMatchup};
pub use memory::{MatchMemory, MatchSession, OutcomeKey};
pub use registry::{MatchRegistry, SharedSession};
pub use rules::{Booster, BoostRule, DebuffRule, HazardLayer, HazardRule, RecoveryRule, Rule, StatusRule, SweepRule};
pub use switching::{Ranked, SwitchEvaluator};
