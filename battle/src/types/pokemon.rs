//! Combatant state as observed for one turn

use std::collections::HashSet;

use super::pokemon_type::Type;
use super::stats::{BaseStats, StatStages, Stats};
use super::status::{Effect, Status};

/// Which side of the battle a combatant belongs to, from our perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SideId {
    Ally,
    Foe,
}

/// Stable identity of a combatant: its side and position in that side's team listing.
///
/// Species names are ambiguous across forme variants, so everything that
/// needs to remember a combatant across turns keys on this instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RosterSlot {
    pub side: SideId,
    /// 0-based index in the team listing
    pub index: usize,
}

impl RosterSlot {
    pub fn ally(index: usize) -> Self {
        Self {
            side: SideId::Ally,
            index,
        }
    }

    pub fn foe(index: usize) -> Self {
        Self {
            side: SideId::Foe,
            index,
        }
    }

    /// 1-based position as used by switch and team choices
    pub fn position(&self) -> usize {
        self.index + 1
    }
}

impl std::fmt::Display for RosterSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let side = match self.side {
            SideId::Ally => "ally",
            SideId::Foe => "foe",
        };
        write!(f, "{}#{}", side, self.position())
    }
}

/// One creature instance. Read-only for the engine apart from stat backfilling.
#[derive(Debug, Clone)]
pub struct Combatant {
    pub slot: RosterSlot,

    /// Species name including forme ("Necrozma-Dusk-Mane")
    pub species: String,

    /// Base species when this is a forme ("Necrozma")
    pub base_species: Option<String>,

    /// Name as shown in the battle log (nickname or species)
    pub name: String,

    pub level: u8,

    // === HP ===
    /// Current HP (percentage for opponent, exact value for our side)
    pub hp_current: u32,
    /// Max HP (100 when only the percentage is known)
    pub hp_max: u32,

    // === Status ===
    pub status: Option<Status>,
    pub fainted: bool,
    pub active: bool,
    pub boosts: StatStages,
    pub effects: HashSet<Effect>,

    // === Typing and moves ===
    pub types: Vec<Type>,
    /// Known move ids; empty when nothing has been revealed
    pub moves: Vec<String>,

    // === Stats ===
    pub stats: Stats,
    pub base_stats: Option<BaseStats>,
}

impl Combatant {
    pub fn new(slot: RosterSlot, species: impl Into<String>, types: Vec<Type>) -> Self {
        let species = species.into();
        Self {
            slot,
            name: species.clone(),
            species,
            base_species: None,
            level: 100,
            hp_current: 100,
            hp_max: 100,
            status: None,
            fainted: false,
            active: false,
            boosts: StatStages::new(),
            effects: HashSet::new(),
            types,
            moves: Vec::new(),
            stats: Stats::default(),
            base_stats: None,
        }
    }

    /// Showdown id of the species
    pub fn species_id(&self) -> String {
        crate::to_id(&self.species)
    }

    /// Showdown id of the base species, when it differs from the species
    pub fn base_species_id(&self) -> Option<String> {
        let base = crate::to_id(self.base_species.as_deref()?);
        (base != self.species_id()).then_some(base)
    }

    /// HP as a fraction in 0.0..=1.0
    pub fn hp_fraction(&self) -> f32 {
        if self.hp_max == 0 || self.fainted {
            return 0.0;
        }
        (self.hp_current as f32 / self.hp_max as f32).clamp(0.0, 1.0)
    }

    pub fn healing_suppressed(&self) -> bool {
        self.effects.iter().any(Effect::suppresses_healing)
    }

    pub fn is_alive(&self) -> bool {
        !self.fainted && self.hp_current > 0
    }

    /// Whether a log name refers to this combatant (nickname or species)
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.species == name
    }
}
