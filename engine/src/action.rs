//! Actions the engine submits and their wire form

use rand::Rng;
use rand::seq::SliceRandom;
use tactician_battle::BattleState;

/// Secondary flag attached to a move choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Terastallize,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Terastallize => "terastallize",
        }
    }
}

/// One decision for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Use a move of the active combatant
    Move {
        id: String,
        modifier: Option<Modifier>,
    },

    /// Switch to the ally roster index
    Switch(usize),

    /// Let the simulator pick (only when nothing else is legal)
    Default,
}

impl Action {
    pub fn use_move(id: impl Into<String>) -> Self {
        Action::Move {
            id: id.into(),
            modifier: None,
        }
    }

    pub fn switch(index: usize) -> Self {
        Action::Switch(index)
    }

    /// Attach a modifier to a move action; other actions are returned unchanged
    pub fn with_modifier(self, modifier: Modifier) -> Self {
        match self {
            Action::Move { id, .. } => Action::Move {
                id,
                modifier: Some(modifier),
            },
            other => other,
        }
    }

    pub fn move_id(&self) -> Option<&str> {
        match self {
            Action::Move { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Whether the snapshot allows this action
    pub fn is_legal(&self, state: &BattleState) -> bool {
        match self {
            Action::Move { id, modifier } => {
                state.can_use_move(id)
                    && match modifier {
                        Some(Modifier::Terastallize) => state.can_terastallize,
                        None => true,
                    }
            }
            Action::Switch(index) => state.can_switch_to(*index),
            Action::Default => true,
        }
    }

    /// Choice string for `/choose` ("move stealthrock", "switch 3", "default")
    pub fn to_choice(&self) -> String {
        match self {
            Action::Move { id, modifier: None } => format!("move {}", id),
            Action::Move {
                id,
                modifier: Some(m),
            } => format!("move {} {}", id, m.as_str()),
            Action::Switch(index) => format!("switch {}", index + 1),
            Action::Default => "default".to_string(),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_choice())
    }
}

/// Pick uniformly among every legal move and switch.
///
/// Falls back to [`Action::Default`] when the snapshot lists nothing legal.
pub fn random_action<R: Rng + ?Sized>(state: &BattleState, rng: &mut R) -> Action {
    let mut choices: Vec<Action> = Vec::new();
    if !state.force_switch {
        choices.extend(state.available_moves.iter().map(|m| Action::use_move(&m.id)));
    }
    choices.extend(state.available_switches.iter().map(|&idx| Action::switch(idx)));

    choices.choose(rng).cloned().unwrap_or(Action::Default)
}

/// Team order submitted at team preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadChoice {
    /// 1-based roster positions, lead first
    order: Vec<usize>,
}

impl LeadChoice {
    /// Keep the listing order
    pub fn in_order(team_size: usize) -> Self {
        Self {
            order: (1..=team_size).collect(),
        }
    }

    /// Put the roster index first, the rest keep their relative order
    pub fn with_lead(lead: usize, team_size: usize) -> Self {
        if lead >= team_size {
            return Self::in_order(team_size);
        }
        let mut order = Vec::with_capacity(team_size);
        order.push(lead + 1);
        order.extend((1..=team_size).filter(|&pos| pos != lead + 1));
        Self { order }
    }

    /// 0-based roster index of the lead
    pub fn lead(&self) -> Option<usize> {
        self.order.first().map(|pos| pos - 1)
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Choice string for `/choose` ("team 312456")
    pub fn to_choice(&self) -> String {
        let digits: Vec<String> = self.order.iter().map(|pos| pos.to_string()).collect();
        let separator = if self.order.len() > 9 { "," } else { "" };
        format!("team {}", digits.join(separator))
    }
}
