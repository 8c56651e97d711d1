//! User collection repository.
//!
//! Collections change on every claim, so this repository is not cached.

use anyhow::Result;
use futures::TryStreamExt;
use mongodb::bson::{doc, to_bson, Document};
use mongodb::options::UpdateOptions;
use mongodb::Collection;

use super::regex_escape;
use crate::database::models::{Character, Collector, HaremSort, Rarity};
use crate::database::Database;

/// Repository for `user_collection`.
pub struct CollectorRepository {
    collection: Collection<Collector>,
}

impl CollectorRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("user_collection"),
        }
    }

    pub async fn get(&self, user_id: i64) -> Result<Option<Collector>> {
        Ok(self.collection.find_one(doc! { "id": user_id }).await?)
    }

    /// Case-insensitive lookup by Telegram username (without `@`).
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Collector>> {
        let pattern = format!("^{}$", regex_escape(username));
        let filter = doc! { "username": { "$regex": pattern, "$options": "i" } };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Push a card into a collection, creating the document if needed.
    ///
    /// `claim_day` counts the card toward that day's claim limit.
    pub async fn add_card(
        &self,
        user_id: i64,
        username: Option<&str>,
        first_name: &str,
        character: &Character,
        claim_day: Option<&str>,
    ) -> Result<()> {
        let mut update = doc! {
            "$push": { "characters": to_bson(&character.card())? },
            "$set": { "username": username, "first_name": first_name },
        };
        if let Some(day) = claim_day {
            let mut inc = Document::new();
            inc.insert(format!("daily_marriages.{day}"), 1);
            update.insert("$inc", inc);
        }

        let options = UpdateOptions::builder().upsert(true).build();
        self.collection
            .update_one(doc! { "id": user_id }, update)
            .with_options(options)
            .await?;
        Ok(())
    }

    /// Remove one copy of a card. Returns false if the user had none.
    pub async fn remove_one(&self, user_id: i64, character_id: &str) -> Result<bool> {
        let Some(mut collector) = self.get(user_id).await? else {
            return Ok(false);
        };
        if collector.take_card(character_id).is_none() {
            return Ok(false);
        }

        self.set_characters(&collector).await?;
        Ok(true)
    }

    /// Persist only the `characters` array of a collector.
    pub async fn set_characters(&self, collector: &Collector) -> Result<()> {
        let cards = to_bson(&collector.characters)?;
        self.collection
            .update_one(doc! { "id": collector.id }, doc! { "$set": { "characters": cards } })
            .await?;
        Ok(())
    }

    /// Remove every copy of a card from every collection.
    pub async fn pull_everywhere(&self, character_id: &str) -> Result<u64> {
        let result = self
            .collection
            .update_many(
                doc! { "characters.id": character_id },
                doc! { "$pull": { "characters": { "id": character_id } } },
            )
            .await?;
        Ok(result.modified_count)
    }

    /// Replace the embedded copies of a catalogue entry after `/update`.
    pub async fn refresh_card(&self, character: &Character) -> Result<u64> {
        let card = character.card();
        let options = UpdateOptions::builder()
            .array_filters(vec![doc! { "c.id": &card.id }])
            .build();
        let result = self
            .collection
            .update_many(
                doc! { "characters.id": &card.id },
                doc! { "$set": { "characters.$[c]": to_bson(&card)? } },
            )
            .with_options(options)
            .await?;
        Ok(result.modified_count)
    }

    /// Collectors owning at least one copy of a card.
    pub async fn owners_of(&self, character_id: &str) -> Result<Vec<Collector>> {
        let cursor = self
            .collection
            .find(doc! { "characters.id": character_id })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Toggle a favourite. Returns true if the card is now a favourite.
    pub async fn toggle_favorite(&self, user_id: i64, character_id: &str) -> Result<bool> {
        let Some(collector) = self.get(user_id).await? else {
            return Ok(false);
        };

        let (update, now_favorite): (Document, bool) =
            if collector.favorites.iter().any(|f| f == character_id) {
                (doc! { "$pull": { "favorites": character_id } }, false)
            } else {
                (doc! { "$addToSet": { "favorites": character_id } }, true)
            };

        self.collection
            .update_one(doc! { "id": user_id }, update)
            .await?;
        Ok(now_favorite)
    }

    pub async fn set_sort(&self, user_id: i64, sort: HaremSort) -> Result<()> {
        let options = UpdateOptions::builder().upsert(true).build();
        self.collection
            .update_one(
                doc! { "id": user_id },
                doc! { "$set": { "harem_sort": sort.as_str() } },
            )
            .with_options(options)
            .await?;
        Ok(())
    }

    /// Rewrite a legacy rarity name inside every collection.
    pub async fn rename_rarity(&self, legacy: &str, rarity: Rarity) -> Result<u64> {
        let options = UpdateOptions::builder()
            .array_filters(vec![doc! { "c.rarity": legacy }])
            .build();
        let result = self
            .collection
            .update_many(
                doc! { "characters.rarity": legacy },
                doc! { "$set": { "characters.$[c].rarity": rarity.as_str() } },
            )
            .with_options(options)
            .await?;
        Ok(result.modified_count)
    }
}
