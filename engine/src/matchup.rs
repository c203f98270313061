//! Type matchup scoring between two combatants

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tactician_battle::{Combatant, Dex, Type};

/// Move-type histogram for one combatant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveTypes {
    counts: HashMap<Type, usize>,
}

impl MoveTypes {
    pub fn add(&mut self, move_type: Type) {
        *self.counts.entry(move_type).or_insert(0) += 1;
    }

    pub fn count(&self, move_type: Type) -> usize {
        self.counts.get(&move_type).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Type, usize)> + '_ {
        self.counts.iter().map(|(&t, &n)| (t, n))
    }
}

impl FromIterator<Type> for MoveTypes {
    fn from_iter<I: IntoIterator<Item = Type>>(iter: I) -> Self {
        let mut types = MoveTypes::default();
        for t in iter {
            types.add(t);
        }
        types
    }
}

/// Scores how well one combatant's moves hit another's typing
#[derive(Debug, Clone)]
pub struct TypeMatchup {
    dex: Arc<Dex>,
}

impl TypeMatchup {
    pub fn new(dex: Arc<Dex>) -> Self {
        Self { dex }
    }

    pub fn dex(&self) -> &Dex {
        &self.dex
    }

    /// Types of the moves a combatant is expected to use.
    ///
    /// Revealed moves win. Without any, the species learnset (plus the base
    /// species learnset for alternate forms) restricted to moves the dex knows.
    /// Each move id counts once.
    pub fn move_types(&self, combatant: &Combatant) -> MoveTypes {
        let mut seen = HashSet::new();
        let known: MoveTypes = combatant
            .moves
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .filter_map(|id| self.dex.get_move(id))
            .map(|m| m.move_type)
            .collect();
        if !known.is_empty() {
            return known;
        }

        let species = combatant.species_id();
        let mut learnable: HashSet<&str> = HashSet::new();
        let mut found = false;
        for id in std::iter::once(species.clone()).chain(combatant.base_species_id()) {
            if let Some(learnset) = self.dex.learnset(&id) {
                found = true;
                learnable.extend(learnset.iter().map(String::as_str));
            }
        }

        if !found {
            tracing::warn!(species = %species, "No learnset found");
            return MoveTypes::default();
        }

        learnable
            .into_iter()
            .filter_map(|id| self.dex.get_move(id))
            .map(|m| m.move_type)
            .collect()
    }

    /// Average effectiveness of the attacker's move types against the defender
    pub fn one_way(&self, attacker: &Combatant, defender: &Combatant) -> f32 {
        let types = self.move_types(attacker);
        let total = types.total();
        if total == 0 {
            return 0.0;
        }

        let chart = self.dex.type_chart();
        let weighted: f32 = types
            .iter()
            .map(|(t, count)| count as f32 * chart.against(t, &defender.types))
            .sum();
        weighted / total as f32
    }

    /// `one_way(a, b) / one_way(b, a)`, infinite when `b` cannot hurt `a`
    pub fn two_way(&self, a: &Combatant, b: &Combatant) -> f32 {
        let reverse = self.one_way(b, a);
        if reverse == 0.0 {
            return f32::INFINITY;
        }
        self.one_way(a, b) / reverse
    }
}
