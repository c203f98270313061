//! Domain types for one battle snapshot

mod conditions;
mod moves;
mod pokemon;
mod pokemon_type;
mod side;
mod stats;
mod status;

pub use conditions::SideCondition;
pub use moves::{Move, MoveCategory};
pub use pokemon::{Combatant, RosterSlot, SideId};
pub use pokemon_type::{Type, TypeChart};
pub use side::SideState;
pub use stats::{BaseStats, Stat, StatStages, Stats};
pub use status::{Effect, Status};
