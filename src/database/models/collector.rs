//! Per-user collection ("harem") document.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::character::Character;

/// How `/harem` groups a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HaremSort {
    #[default]
    Rarity,
    Anime,
}

impl HaremSort {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rarity" => Some(Self::Rarity),
            "anime" => Some(Self::Anime),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rarity => "rarity",
            Self::Anime => "anime",
        }
    }
}

/// A player and their claimed cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collector {
    /// Telegram user id.
    pub id: i64,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub first_name: String,

    /// Claimed cards; duplicates are separate entries.
    #[serde(default)]
    pub characters: Vec<Character>,

    /// Claims per UTC day, keyed `YYYY-MM-DD`.
    #[serde(default)]
    pub daily_marriages: HashMap<String, u32>,

    /// Favourite card ids, shown first in `/harem`.
    #[serde(default)]
    pub favorites: Vec<String>,

    #[serde(default)]
    pub harem_sort: HaremSort,
}

impl Collector {
    pub fn new(id: i64, username: Option<String>, first_name: impl Into<String>) -> Self {
        Self {
            id,
            username,
            first_name: first_name.into(),
            characters: Vec::new(),
            daily_marriages: HashMap::new(),
            favorites: Vec::new(),
            harem_sort: HaremSort::default(),
        }
    }

    /// Claims made on `day` (`YYYY-MM-DD`).
    pub fn marriages_on(&self, day: &str) -> u32 {
        self.daily_marriages.get(day).copied().unwrap_or(0)
    }

    /// First owned copy of a card.
    pub fn find_card(&self, character_id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == character_id)
    }

    /// Number of owned copies of a card.
    pub fn copies_of(&self, character_id: &str) -> usize {
        self.characters.iter().filter(|c| c.id == character_id).count()
    }

    /// Remove one copy of a card, returning it.
    pub fn take_card(&mut self, character_id: &str) -> Option<Character> {
        let pos = self.characters.iter().position(|c| c.id == character_id)?;
        Some(self.characters.remove(pos))
    }
}

/// Today's key for `daily_marriages`.
pub fn utc_day_key(now: chrono::DateTime<chrono::Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Rarity;
    use chrono::TimeZone;

    fn card(id: &str) -> Character {
        Character::new(id, format!("Card {id}"), "Show", Rarity::Common, "u")
    }

    #[test]
    fn test_take_card_removes_one_copy() {
        let mut c = Collector::new(1, None, "A");
        c.characters = vec![card("1"), card("2"), card("1")];

        assert_eq!(c.copies_of("1"), 2);
        assert_eq!(c.take_card("1").map(|c| c.id), Some("1".to_string()));
        assert_eq!(c.copies_of("1"), 1);
        assert!(c.take_card("9").is_none());
        assert_eq!(c.characters.len(), 2);
    }

    #[test]
    fn test_day_key() {
        let t = chrono::Utc.with_ymd_and_hms(2024, 12, 25, 23, 59, 0).unwrap();
        assert_eq!(utc_day_key(t), "2024-12-25");
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(HaremSort::parse("Anime"), Some(HaremSort::Anime));
        assert_eq!(HaremSort::parse("name"), None);
    }
}
