//! Themed event state.

use anyhow::Result;
use mongodb::bson::doc;
use mongodb::Collection;
use tracing::info;

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::database::models::event::now_stamp;
use crate::database::models::EventSettings;
use crate::database::Database;

pub struct EventRepository {
    collection: Collection<EventSettings>,
    active: TypedCache<(), Option<EventSettings>>,
}

impl EventRepository {
    pub fn new(db: &Database, cache: &CacheRegistry) -> Self {
        Self {
            collection: db.collection("event_settings"),
            active: cache.get_or_create("active_event", CacheConfig::global_lookup()),
        }
    }

    /// The running event, if any.
    pub async fn active(&self) -> Result<Option<EventSettings>> {
        self.active
            .current_or_load(|| async {
                Ok::<_, anyhow::Error>(self.collection.find_one(doc! { "active": true }).await?)
            })
            .await
    }

    /// Start an event. Returns false if one is already running.
    pub async fn start(&self, event: &EventSettings) -> Result<bool> {
        self.active.clear();
        if self.active().await?.is_some() {
            return Ok(false);
        }

        self.collection.insert_one(event).await?;
        self.active.replace(Some(event.clone()));
        info!("Event '{}' started by {}", event.event_type, event.started_by);
        Ok(true)
    }

    /// End the running event, returning it.
    pub async fn end(&self, ended_by: i64, ended_by_name: &str) -> Result<Option<EventSettings>> {
        self.active.clear();
        let Some(mut event) = self.active().await? else {
            return Ok(None);
        };

        let ended_at = now_stamp();
        self.collection
            .update_many(
                doc! { "active": true },
                doc! { "$set": {
                    "active": false,
                    "ended_at": &ended_at,
                    "ended_by": ended_by,
                    "ended_by_name": ended_by_name,
                } },
            )
            .await?;

        self.active.replace(None);
        event.active = false;
        event.ended_at = Some(ended_at);
        event.ended_by = Some(ended_by);
        event.ended_by_name = Some(ended_by_name.to_string());
        info!("Event '{}' ended by {}", event.event_type, ended_by);
        Ok(Some(event))
    }
}
