//! Characters locked out of spawning.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Collection;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::models::LockedSpawn;
use crate::database::Database;

pub struct SpawnLockRepository {
    collection: Collection<LockedSpawn>,
    ids: TypedCache<(), Arc<HashSet<String>>>,
}

impl SpawnLockRepository {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        Self {
            collection: db.collection("locked_spawns"),
            ids: cache.get_or_create("locked_spawn_ids", CacheConfig::global_lookup()),
        }
    }

    /// Ids of every locked character.
    pub async fn locked_ids(&self) -> Result<Arc<HashSet<String>>> {
        self.ids
            .current_or_load(|| async {
                let ids: HashSet<String> = self
                    .list()
                    .await?
                    .into_iter()
                    .map(|l| l.character_id)
                    .collect();
                Ok::<_, anyhow::Error>(Arc::new(ids))
            })
            .await
    }

    /// All locks, in insertion order.
    pub async fn list(&self) -> Result<Vec<LockedSpawn>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Lock a character. Returns false if it was already locked.
    pub async fn lock(&self, lock: &LockedSpawn) -> Result<bool> {
        if self.locked_ids().await?.contains(&lock.character_id) {
            return Ok(false);
        }
        self.collection.insert_one(lock).await?;
        self.ids.clear();
        Ok(true)
    }

    /// Unlock a character, returning the removed lock.
    pub async fn unlock(&self, character_id: &str) -> Result<Option<LockedSpawn>> {
        let removed = self
            .collection
            .find_one_and_delete(doc! { "character_id": character_id })
            .await?;
        self.ids.clear();
        Ok(removed)
    }
}
