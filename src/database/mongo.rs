//! MongoDB database wrapper.

use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use tracing::{info, warn};

/// Database wrapper for MongoDB operations.
#[derive(Debug, Clone)]
pub struct Database {
    db: mongodb::Database,
}

impl Database {
    /// Connect to MongoDB with the given URI and database name.
    ///
    /// # Errors
    /// Returns error if connection fails.
    pub async fn connect(uri: &str, db_name: &str) -> anyhow::Result<Self> {
        let options = ClientOptions::parse(uri).await?;
        let client = Client::with_options(options)?;

        // Ping the database to verify connection
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("Successfully connected to MongoDB");

        let db = Self {
            db: client.database(db_name),
        };
        db.ensure_indexes().await;

        Ok(db)
    }

    /// Get a typed collection from the database.
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Create the lookup indexes. Failures are logged and skipped.
    async fn ensure_indexes(&self) {
        let indexes = [
            ("characters", doc! { "id": 1 }, true),
            ("user_collection", doc! { "id": 1 }, true),
            ("user_collection", doc! { "characters.id": 1 }, false),
            ("group_user_totals", doc! { "group_id": 1, "user_id": 1 }, true),
            ("top_global_groups", doc! { "group_id": 1 }, true),
            ("chat_settings", doc! { "chat_id": 1 }, true),
            ("locked_spawns", doc! { "character_id": 1 }, true),
            ("dynamic_uploading_users", doc! { "user_id": 1 }, true),
            ("banned_users", doc! { "user_id": 1 }, true),
        ];

        for (collection, keys, unique) in indexes {
            let model = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(unique).build())
                .build();

            if let Err(e) = self
                .collection::<mongodb::bson::Document>(collection)
                .create_index(model)
                .await
            {
                warn!("Could not create index on {}: {}", collection, e);
            }
        }
    }
}
