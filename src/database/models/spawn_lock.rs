//! Characters excluded from spawning.

use serde::{Deserialize, Serialize};

use super::{Character, Rarity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockedSpawn {
    pub character_id: String,
    pub character_name: String,
    #[serde(default)]
    pub anime: String,
    pub rarity: Rarity,
    pub locked_by: i64,
    #[serde(default)]
    pub locked_by_username: Option<String>,
}

impl LockedSpawn {
    pub fn new(character: &Character, locked_by: i64, locked_by_username: Option<String>) -> Self {
        Self {
            character_id: character.id.clone(),
            character_name: character.name.clone(),
            anime: character.anime.clone(),
            rarity: character.rarity,
            locked_by,
            locked_by_username,
        }
    }
}
