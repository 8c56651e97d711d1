//! Character catalogue repository.
//!
//! The full catalogue is read on every spawn, so it is cached as one
//! snapshot with a short TTL and dropped on every write.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::Collection;
use tracing::{debug, info};

use super::regex_escape;
use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::models::{Character, Rarity};
use crate::database::Database;

const SEQUENCE_ID: &str = "character_id";

/// Repository for the `characters` catalogue and its id sequence.
pub struct CharacterRepository {
    collection: Collection<Character>,
    sequences: Collection<Document>,
    snapshot: TypedCache<(), Arc<Vec<Character>>>,
}

impl CharacterRepository {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        Self {
            collection: db.collection("characters"),
            sequences: db.collection("sequences"),
            snapshot: cache.get_or_create("character_catalogue", CacheConfig::global_lookup()),
        }
    }

    /// Reserve the next catalogue id.
    pub async fn next_id(&self) -> Result<String> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let sequence = self
            .sequences
            .find_one_and_update(
                doc! { "_id": SEQUENCE_ID },
                doc! { "$inc": { "sequence_value": 1 } },
            )
            .with_options(options)
            .await?
            .ok_or_else(|| anyhow!("sequence document missing after upsert"))?;

        let value = match sequence.get("sequence_value") {
            Some(Bson::Int32(v)) => i64::from(*v),
            Some(Bson::Int64(v)) => *v,
            Some(Bson::Double(v)) => *v as i64,
            other => return Err(anyhow!("unexpected sequence value {:?}", other)),
        };

        Ok(value.to_string())
    }

    /// Get a character by catalogue id.
    pub async fn get(&self, id: &str) -> Result<Option<Character>> {
        if let Some(all) = self.snapshot.current() {
            return Ok(all.iter().find(|c| c.id == id).cloned());
        }
        Ok(self.collection.find_one(doc! { "id": id }).await?)
    }

    /// The whole catalogue.
    pub async fn all(&self) -> Result<Arc<Vec<Character>>> {
        if let Some(all) = self.snapshot.current() {
            return Ok(all);
        }

        let cursor = self.collection.find(doc! {}).await?;
        let all: Vec<Character> = cursor.try_collect().await?;
        let all = Arc::new(all);

        debug!("Loaded {} characters into {}", all.len(), self.snapshot.name());
        self.snapshot.replace(all.clone());
        Ok(all)
    }

    /// Catalogue entries whose name or anime contains `query`.
    pub async fn search(&self, query: &str, limit: i64) -> Result<Vec<Character>> {
        let pattern = regex_escape(query.trim());
        let filter = doc! {
            "$or": [
                { "name": { "$regex": &pattern, "$options": "i" } },
                { "anime": { "$regex": &pattern, "$options": "i" } },
            ]
        };
        let options = FindOptions::builder().limit(limit).build();

        let cursor = self.collection.find(filter).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Number of characters whose name contains `needle`.
    pub async fn count_name_containing(&self, needle: &str) -> Result<u64> {
        let filter = doc! { "name": { "$regex": regex_escape(needle) } };
        Ok(self.collection.count_documents(filter).await?)
    }

    pub async fn insert(&self, character: &Character) -> Result<()> {
        self.collection.insert_one(character).await?;
        self.snapshot.clear();
        info!("Character {} ({}) added", character.id, character.name);
        Ok(())
    }

    /// Replace a character document, matched by catalogue id.
    pub async fn update(&self, character: &Character) -> Result<bool> {
        let result = self
            .collection
            .replace_one(doc! { "id": &character.id }, character.card())
            .await?;
        self.snapshot.clear();
        Ok(result.matched_count > 0)
    }

    pub async fn set_message_id(&self, id: &str, message_id: i32) -> Result<()> {
        self.collection
            .update_one(doc! { "id": id }, doc! { "$set": { "message_id": message_id } })
            .await?;
        self.snapshot.clear();
        Ok(())
    }

    /// Delete a character, returning the removed document.
    pub async fn delete(&self, id: &str) -> Result<Option<Character>> {
        let removed = self.collection.find_one_and_delete(doc! { "id": id }).await?;
        self.snapshot.clear();
        Ok(removed)
    }

    /// Rewrite a stored rarity name. Returns the number of documents changed.
    pub async fn rename_rarity(&self, legacy: &str, rarity: Rarity) -> Result<u64> {
        let result = self
            .collection
            .update_many(
                doc! { "rarity": legacy },
                doc! { "$set": { "rarity": rarity.as_str() } },
            )
            .await?;
        self.snapshot.clear();
        Ok(result.modified_count)
    }
}
