//! Claim bans ("bonks").

use anyhow::Result;
use mongodb::bson::doc;
use mongodb::options::ReplaceOptions;
use mongodb::Collection;
use tracing::debug;

use crate::database::models::BannedUser;
use crate::database::Database;

pub struct BanRepository {
    collection: Collection<BannedUser>,
}

impl BanRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("banned_users"),
        }
    }

    /// The user's ban if it is still running. Expired bans are deleted.
    pub async fn active_ban(&self, user_id: i64) -> Result<Option<BannedUser>> {
        let Some(ban) = self.collection.find_one(doc! { "user_id": user_id }).await? else {
            return Ok(None);
        };

        if ban.is_expired(chrono::Utc::now()) {
            self.unban(user_id).await?;
            debug!("Expired ban of user {} removed", user_id);
            return Ok(None);
        }

        Ok(Some(ban))
    }

    /// Ban a user, replacing an earlier ban.
    pub async fn ban(&self, ban: &BannedUser) -> Result<()> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection
            .replace_one(doc! { "user_id": ban.user_id }, ban)
            .with_options(options)
            .await?;
        Ok(())
    }

    /// Returns false if the user was not banned.
    pub async fn unban(&self, user_id: i64) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "user_id": user_id }).await?;
        Ok(result.deleted_count > 0)
    }
}
