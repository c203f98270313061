//! Side (player) state

use std::collections::HashMap;

use super::conditions::SideCondition;
use super::pokemon::Combatant;

/// One player's side of the battle (singles)
#[derive(Debug, Clone, Default)]
pub struct SideState {
    /// Combatants in team-listing order
    pub roster: Vec<Combatant>,

    /// Index of the active combatant in `roster`
    pub active: Option<usize>,

    /// Side conditions and their layer counts
    pub conditions: HashMap<SideCondition, u8>,
}

impl SideState {
    pub fn new(roster: Vec<Combatant>) -> Self {
        Self {
            roster,
            active: None,
            conditions: HashMap::new(),
        }
    }

    pub fn active_combatant(&self) -> Option<&Combatant> {
        self.active.and_then(|idx| self.roster.get(idx))
    }

    pub fn get(&self, index: usize) -> Option<&Combatant> {
        self.roster.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Combatant> {
        self.roster.get_mut(index)
    }

    /// First combatant in listing order that has not fainted
    pub fn first_alive(&self) -> Option<&Combatant> {
        self.roster.iter().find(|c| c.is_alive())
    }

    /// Find a combatant by log name (nickname or species)
    pub fn find(&self, name: &str) -> Option<&Combatant> {
        self.roster.iter().find(|c| c.answers_to(name))
    }

    /// Layers for a condition (0 if not present)
    pub fn layers(&self, condition: SideCondition) -> u8 {
        self.conditions.get(&condition).copied().unwrap_or(0)
    }

    /// Add a layer, respecting the game's stacking limit. Returns false at the limit.
    pub fn add_layer(&mut self, condition: SideCondition) -> bool {
        let layers = self.conditions.entry(condition).or_insert(0);
        if *layers < condition.max_layers() {
            *layers += 1;
            true
        } else {
            false
        }
    }

    /// Total hazard layers on this side
    pub fn hazard_layers(&self) -> u32 {
        self.conditions
            .iter()
            .filter(|(cond, _)| cond.is_hazard())
            .map(|(_, &layers)| layers as u32)
            .sum()
    }

    pub fn has_hazards(&self) -> bool {
        self.hazard_layers() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RosterSlot, Type};

    fn create_test_side() -> SideState {
        let mut first = Combatant::new(RosterSlot::ally(0), "Forretress", vec![Type::Bug, Type::Steel]);
        first.fainted = true;
        first.hp_current = 0;
        let mut second = Combatant::new(RosterSlot::ally(1), "Great Tusk", vec![Type::Ground, Type::Fighting]);
        second.name = "Tusky".to_string();
        let third = Combatant::new(RosterSlot::ally(2), "Gholdengo", vec![Type::Steel, Type::Ghost]);

        let mut side = SideState::new(vec![first, second, third]);
        side.active = Some(2);
        side
    }

    #[test]
    fn test_active_and_first_alive() {
        let side = create_test_side();
        assert_eq!(side.active_combatant().unwrap().species, "Gholdengo");
        assert_eq!(side.first_alive().unwrap().species, "Great Tusk");
    }

    #[test]
    fn test_find_by_nickname_or_species() {
        let side = create_test_side();
        assert_eq!(side.find("Tusky").unwrap().slot.index, 1);
        assert_eq!(side.find("Great Tusk").unwrap().slot.index, 1);
        assert!(side.find("Kyogre").is_none());
    }

    #[test]
    fn test_layers_respect_game_limits() {
        let mut side = SideState::default();
        assert_eq!(side.layers(SideCondition::Spikes), 0);

        assert!(side.add_layer(SideCondition::Spikes));
        assert!(side.add_layer(SideCondition::Spikes));
        assert!(side.add_layer(SideCondition::Spikes));
        assert!(!side.add_layer(SideCondition::Spikes));
        assert_eq!(side.layers(SideCondition::Spikes), 3);

        assert!(side.add_layer(SideCondition::StealthRock));
        assert!(!side.add_layer(SideCondition::StealthRock));
        assert_eq!(side.hazard_layers(), 4);
    }

    #[test]
    fn test_screens_are_not_hazards() {
        let mut side = SideState::default();
        side.add_layer(SideCondition::Reflect);
        assert!(!side.has_hazards());
        side.add_layer(SideCondition::ToxicSpikes);
        assert!(side.has_hazards());
    }
}
