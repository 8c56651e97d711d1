//! Per-chat spawn frequency.
//!
//! Read on every counted message, so reads go through a 10 minute cache.

use anyhow::Result;
use mongodb::bson::doc;
use mongodb::options::ReplaceOptions;
use mongodb::Collection;
use tracing::debug;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::models::ChatSettings;
use crate::database::Database;

pub struct ChatSettingsRepository {
    collection: Collection<ChatSettings>,
    cache: TypedCache<i64, Option<ChatSettings>>,
}

impl ChatSettingsRepository {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        Self {
            collection: db.collection("chat_settings"),
            cache: cache.get_or_create("chat_settings", CacheConfig::chat_settings()),
        }
    }

    /// Get settings, returning None if the chat never changed them.
    pub async fn get(&self, chat_id: i64) -> Result<Option<ChatSettings>> {
        self.cache
            .get_or_load(chat_id, || async {
                debug!("Loading ChatSettings for chat {}", chat_id);
                Ok::<_, anyhow::Error>(self.collection.find_one(doc! { "chat_id": chat_id }).await?)
            })
            .await
    }

    /// Messages between spawns for a chat.
    pub async fn frequency(&self, chat_id: i64, default: u32) -> Result<u32> {
        Ok(self
            .get(chat_id)
            .await?
            .map(|s| s.message_frequency.max(1))
            .unwrap_or(default))
    }

    /// Save settings (upsert).
    pub async fn save(&self, settings: &ChatSettings) -> Result<()> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection
            .replace_one(doc! { "chat_id": settings.chat_id }, settings)
            .with_options(options)
            .await?;

        self.cache.insert(settings.chat_id, Some(settings.clone()));
        debug!("Saved ChatSettings for chat {}", settings.chat_id);
        Ok(())
    }
}
