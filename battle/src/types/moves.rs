//! Move data as supplied for the current turn

use serde::{Deserialize, Serialize};

use super::conditions::SideCondition;
use super::pokemon_type::Type;
use super::status::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// A move the active combatant can use
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    /// Showdown id ("stealthrock")
    pub id: String,
    /// Display name ("Stealth Rock")
    pub name: String,
    pub move_type: Type,
    pub category: MoveCategory,
    pub base_power: u32,
    /// Hit chance in percent, `None` when the move cannot miss
    pub accuracy: Option<u8>,
    pub priority: i8,
    /// Fraction of max HP restored to the user (numerator, denominator)
    pub heal: Option<(u32, u32)>,
    /// Side condition placed on the target's side
    pub side_condition: Option<SideCondition>,
    /// Non-volatile status inflicted on the target
    pub status: Option<Status>,
    /// Damage lands some turns after use (Future Sight, Doom Desire)
    pub delayed: bool,
}

impl Move {
    pub fn new(name: impl Into<String>, move_type: Type, category: MoveCategory, base_power: u32) -> Self {
        let name = name.into();
        Self {
            id: crate::to_id(&name),
            name,
            move_type,
            category,
            base_power,
            accuracy: Some(100),
            priority: 0,
            heal: None,
            side_condition: None,
            status: None,
            delayed: false,
        }
    }

    pub fn with_heal(mut self, numerator: u32, denominator: u32) -> Self {
        self.heal = Some((numerator, denominator));
        self
    }

    pub fn delayed(mut self) -> Self {
        self.delayed = true;
        self
    }

    /// Restores a positive share of the user's HP
    pub fn is_recovery(&self) -> bool {
        self.heal.is_some_and(|(num, den)| num > 0 && den > 0)
    }

    pub fn is_status(&self) -> bool {
        self.category == MoveCategory::Status
    }
}
