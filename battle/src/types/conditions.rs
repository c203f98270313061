//! Side conditions (hazards, screens, etc.)

use serde::{Deserialize, Serialize};

/// Side-level field effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideCondition {
    // Entry hazards
    StealthRock,
    Spikes,      // Stackable 1-3
    ToxicSpikes, // Stackable 1-2
    StickyWeb,

    // Screens
    Reflect,
    LightScreen,
    AuroraVeil,

    // Other
    Tailwind,
    Safeguard,
    Mist,
}

impl SideCondition {
    /// Parse from protocol or data string ("move: Stealth Rock", "stealthrock", ...)
    pub fn from_protocol(s: &str) -> Option<Self> {
        let clean = s.strip_prefix("move: ").unwrap_or(s);

        match crate::to_id(clean).as_str() {
            "stealthrock" => Some(SideCondition::StealthRock),
            "spikes" => Some(SideCondition::Spikes),
            "toxicspikes" => Some(SideCondition::ToxicSpikes),
            "stickyweb" => Some(SideCondition::StickyWeb),
            "reflect" => Some(SideCondition::Reflect),
            "lightscreen" => Some(SideCondition::LightScreen),
            "auroraveil" => Some(SideCondition::AuroraVeil),
            "tailwind" => Some(SideCondition::Tailwind),
            "safeguard" => Some(SideCondition::Safeguard),
            "mist" => Some(SideCondition::Mist),
            _ => None,
        }
    }

    /// Maximum layers the game allows for this condition
    pub fn max_layers(&self) -> u8 {
        match self {
            SideCondition::Spikes => 3,
            SideCondition::ToxicSpikes => 2,
            _ => 1,
        }
    }

    /// Check if this is an entry hazard
    pub fn is_hazard(&self) -> bool {
        matches!(
            self,
            SideCondition::StealthRock
                | SideCondition::Spikes
                | SideCondition::ToxicSpikes
                | SideCondition::StickyWeb
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SideCondition::StealthRock => "Stealth Rock",
            SideCondition::Spikes => "Spikes",
            SideCondition::ToxicSpikes => "Toxic Spikes",
            SideCondition::StickyWeb => "Sticky Web",
            SideCondition::Reflect => "Reflect",
            SideCondition::LightScreen => "Light Screen",
            SideCondition::AuroraVeil => "Aurora Veil",
            SideCondition::Tailwind => "Tailwind",
            SideCondition::Safeguard => "Safeguard",
            SideCondition::Mist => "Mist",
        }
    }
}

impl std::fmt::Display for SideCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
