//! Battle snapshot types and static game data for the tactician engine.
//!
//! This crate holds everything the decision engine reads but never owns:
//!
//! ```text
//! transport / battle tracker (external)
//!        │  builds
//!        ▼
//! tactician-battle (snapshot types + Dex) ← THIS CRATE
//!        │  read by
//!        ▼
//! tactician-engine (heuristic decision cascade)
//! ```
//!
//! # Main Types
//!
//! - [`BattleState`] - one decision point: both sides, legal moves and switches
//! - [`Combatant`] - one creature, identified by its [`RosterSlot`]
//! - [`Move`] - a usable move with the flags the heuristics look at
//! - [`SideState`] - roster, active index and side conditions (hazard layers)
//! - [`Dex`] - type chart, move database, learnsets and species baselines
//!
//! # Example Usage
//!
//! ```ignore
//! use tactician_battle::{Dex, Type};
//!
//! let dex = Dex::load("data/gen9.json")?;
//! let chart = dex.type_chart();
//! assert_eq!(chart.against(Type::Fire, &[Type::Grass, Type::Steel]), 4.0);
//! ```

pub mod dex;
pub mod id;
pub mod state;
pub mod types;

pub use dex::{Dex, DexError, SpeciesData};
pub use id::to_id;
pub use state::{BattleState, MatchId, Player};
pub use types::{
    BaseStats, Combatant, Effect, Move, MoveCategory, RosterSlot, SideCondition, SideId,
    SideState, Stat, StatStages, Stats, Status, Type, TypeChart,
};
