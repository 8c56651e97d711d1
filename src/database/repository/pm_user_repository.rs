//! Private-chat users, the PM half of `/broadcast`.

use anyhow::Result;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::ReplaceOptions;
use mongodb::Collection;

use crate::database::models::PmUser;
use crate::database::Database;

pub struct PmUserRepository {
    collection: Collection<PmUser>,
}

impl PmUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("pm_users"),
        }
    }

    pub async fn record(&self, user: &PmUser) -> Result<()> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection
            .replace_one(doc! { "_id": user.id }, user)
            .with_options(options)
            .await?;
        Ok(())
    }

    pub async fn user_ids(&self) -> Result<Vec<i64>> {
        let cursor = self.collection.find(doc! {}).await?;
        let users: Vec<PmUser> = cursor.try_collect().await?;
        Ok(users.into_iter().map(|u| u.id).collect())
    }
}
