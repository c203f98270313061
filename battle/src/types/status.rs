//! Status conditions (volatile and non-volatile)

use serde::{Deserialize, Serialize};

/// Non-volatile status conditions (persist through switching)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "brn")]
    Burn,
    #[serde(rename = "frz")]
    Freeze,
    #[serde(rename = "par")]
    Paralysis,
    #[serde(rename = "psn")]
    Poison,
    #[serde(rename = "tox")]
    BadPoison,
    #[serde(rename = "slp")]
    Sleep,
}

impl Status {
    /// Parse from protocol string ("brn", "frz", "par", "psn", "tox", "slp")
    pub fn from_protocol(s: &str) -> Option<Self> {
        match s {
            "brn" => Some(Status::Burn),
            "frz" => Some(Status::Freeze),
            "par" => Some(Status::Paralysis),
            "psn" => Some(Status::Poison),
            "tox" => Some(Status::BadPoison),
            "slp" => Some(Status::Sleep),
            _ => None,
        }
    }

    pub fn to_protocol(&self) -> &'static str {
        match self {
            Status::Burn => "brn",
            Status::Freeze => "frz",
            Status::Paralysis => "par",
            Status::Poison => "psn",
            Status::BadPoison => "tox",
            Status::Sleep => "slp",
        }
    }

    /// Poison and toxic poison both deal residual damage every turn
    pub fn is_poison(&self) -> bool {
        matches!(self, Status::Poison | Status::BadPoison)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_protocol())
    }
}

/// Volatile effects on a combatant (cleared on switching)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Effect {
    HealBlock,
    /// Any other effect, by its display name
    Other(String),
}

impl Effect {
    /// Whether this effect prevents recovery moves from being selected
    pub fn suppresses_healing(&self) -> bool {
        matches!(self, Effect::HealBlock)
    }
}
