//! Catalogue character card.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::rarity::Rarity;
use crate::utils::media::is_video_url;

/// A character card, as stored in the catalogue and embedded in
/// collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// MongoDB document ID (catalogue only; stripped when embedded)
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,

    /// Sequential catalogue id, stored as a decimal string.
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub anime: String,

    pub rarity: Rarity,

    #[serde(default)]
    pub img_url: String,

    /// Post in the catalogue channel, if one was made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<i32>,
}

impl Character {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        anime: impl Into<String>,
        rarity: Rarity,
        img_url: impl Into<String>,
    ) -> Self {
        Self {
            object_id: None,
            id: id.into(),
            name: name.into(),
            anime: anime.into(),
            rarity,
            img_url: img_url.into(),
            message_id: None,
        }
    }

    /// Copy suitable for embedding in a user's collection.
    pub fn card(&self) -> Self {
        Self {
            object_id: None,
            ..self.clone()
        }
    }

    /// Video cards are sent with `send_video`.
    pub fn is_video(&self) -> bool {
        is_video_url(&self.img_url) || self.name.contains('🎬')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_detection() {
        let c = Character::new("1", "Rem", "Re Zero", Rarity::Rare, "https://x.io/a.MP4");
        assert!(c.is_video());
        let c = Character::new("2", "Rem 🎬", "Re Zero", Rarity::Rare, "https://x.io/a.jpg");
        assert!(c.is_video());
        let c = Character::new("3", "Rem", "Re Zero", Rarity::Rare, "https://x.io/a.jpg");
        assert!(!c.is_video());
    }

    #[test]
    fn test_card_strips_object_id() {
        let mut c = Character::new("1", "Rem", "Re Zero", Rarity::Rare, "u");
        c.object_id = Some(ObjectId::new());
        assert!(c.card().object_id.is_none());
        assert_eq!(c.card().id, "1");
    }
}
