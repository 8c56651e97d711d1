//! Uploaders added at runtime.

use anyhow::Result;
use mongodb::bson::doc;
use mongodb::options::ReplaceOptions;
use mongodb::Collection;

use crate::database::models::Uploader;
use crate::database::Database;

/// Repository for `dynamic_uploading_users`.
///
/// Level lookups are cached by [`crate::permissions::Permissions`].
pub struct UploaderRepository {
    collection: Collection<Uploader>,
}

impl UploaderRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("dynamic_uploading_users"),
        }
    }

    pub async fn get(&self, user_id: i64) -> Result<Option<Uploader>> {
        Ok(self.collection.find_one(doc! { "user_id": user_id }).await?)
    }

    /// Add or re-level an uploader.
    pub async fn save(&self, uploader: &Uploader) -> Result<()> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection
            .replace_one(doc! { "user_id": uploader.user_id }, uploader)
            .with_options(options)
            .await?;
        Ok(())
    }

    /// Returns false if the user was not an uploader.
    pub async fn remove(&self, user_id: i64) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "user_id": user_id }).await?;
        Ok(result.deleted_count > 0)
    }
}
