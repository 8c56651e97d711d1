//! Card rarity tiers.
//!
//! Rarity drives spawn probability, uploader permissions and display order.

use serde::{Deserialize, Serialize};

/// Rarity tier of a character card.
///
/// Stored in MongoDB by display name. `Celestial` and `Arcane` are the
/// pre-rename names of Retro and Zenith and are still accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    #[serde(alias = "Celestial")]
    Retro,
    Star,
    #[serde(alias = "Arcane")]
    Zenith,
    #[serde(rename = "Limited Edition")]
    LimitedEdition,
    Custom,
}

impl Rarity {
    /// All tiers in upload-number order (1..=11).
    pub const ALL: [Rarity; 11] = [
        Self::Common,
        Self::Uncommon,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
        Self::Mythic,
        Self::Retro,
        Self::Star,
        Self::Zenith,
        Self::LimitedEdition,
        Self::Custom,
    ];

    /// Display order for collections and listings, highest tier first.
    pub const DISPLAY_ORDER: [Rarity; 11] = [
        Self::Custom,
        Self::LimitedEdition,
        Self::Zenith,
        Self::Star,
        Self::Retro,
        Self::Mythic,
        Self::Legendary,
        Self::Epic,
        Self::Rare,
        Self::Uncommon,
        Self::Common,
    ];

    /// Resolve the number used by `/upload` and `/update`.
    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn number(self) -> u8 {
        // ALL is indexed by number - 1
        Self::ALL.iter().position(|r| *r == self).unwrap_or(0) as u8 + 1
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
            Self::Mythic => "Mythic",
            Self::Retro => "Retro",
            Self::Star => "Star",
            Self::Zenith => "Zenith",
            Self::LimitedEdition => "Limited Edition",
            Self::Custom => "Custom",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Common => "⚪️",
            Self::Uncommon => "🟢",
            Self::Rare => "🔵",
            Self::Epic => "🟣",
            Self::Legendary => "🟡",
            Self::Mythic => "🏵",
            Self::Retro => "🍥",
            Self::Star => "⭐",
            Self::Zenith => "🪩",
            Self::LimitedEdition => "🍬",
            Self::Custom => "👾",
        }
    }

    /// Weight for automatic spawns. Zero never spawns.
    ///
    /// Star has a dedicated spawn loop in the star chat, Custom cards are
    /// owner-specific and never spawn.
    pub fn spawn_weight(self) -> f64 {
        match self {
            Self::Common => 100.0,
            Self::Uncommon => 80.0,
            Self::Rare => 50.0,
            Self::Epic => 30.0,
            Self::Legendary => 10.0,
            Self::Mythic => 5.0,
            Self::Retro => 2.0,
            Self::Zenith => 1.0,
            Self::LimitedEdition => 0.25,
            Self::Star | Self::Custom => 0.0,
        }
    }

    /// Weight for `/summon`. Retro is boosted compared to automatic spawns.
    pub fn summon_weight(self) -> f64 {
        match self {
            Self::Retro => 5.0,
            other => other.spawn_weight(),
        }
    }

    /// Highest upload number an uploader of `level` may use.
    pub fn max_number_for_level(level: u8) -> u8 {
        match level {
            0 => 0,
            1 => Self::Mythic.number(),
            2 => Self::Zenith.number(),
            _ => Self::Custom.number(),
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    #[test]
    fn test_upload_numbers() {
        assert_eq!(Rarity::from_number(1), Some(Rarity::Common));
        assert_eq!(Rarity::from_number(6), Some(Rarity::Mythic));
        assert_eq!(Rarity::from_number(10), Some(Rarity::LimitedEdition));
        assert_eq!(Rarity::from_number(11), Some(Rarity::Custom));
        assert_eq!(Rarity::from_number(0), None);
        assert_eq!(Rarity::from_number(12), None);
        assert_eq!(Rarity::Zenith.number(), 9);
    }

    #[test]
    fn test_level_caps() {
        assert_eq!(Rarity::max_number_for_level(0), 0);
        assert_eq!(Rarity::max_number_for_level(1), 6);
        assert_eq!(Rarity::max_number_for_level(2), 9);
        assert_eq!(Rarity::max_number_for_level(3), 11);
    }

    #[test]
    fn test_serde_names_and_legacy_aliases() {
        use mongodb::bson::{from_bson, to_bson, Bson};

        let doc = to_bson(&Rarity::LimitedEdition).unwrap();
        assert_eq!(doc, Bson::String("Limited Edition".into()));

        let legacy: Rarity = from_bson(Bson::String("Celestial".into())).unwrap();
        assert_eq!(legacy, Rarity::Retro);
        let legacy: Rarity = from_bson(Bson::String("Arcane".into())).unwrap();
        assert_eq!(legacy, Rarity::Zenith);
    }

    #[test]
    fn test_non_spawning_tiers() {
        assert_eq!(Rarity::Star.spawn_weight(), 0.0);
        assert_eq!(Rarity::Custom.summon_weight(), 0.0);
        assert_eq!(Rarity::Retro.summon_weight(), 5.0);
        assert!(Rarity::Common.spawn_weight() > Rarity::Mythic.spawn_weight());
    }
}
