//! Claim leaderboards.

use anyhow::Result;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{FindOptions, UpdateOptions};
use mongodb::Collection;

use crate::database::models::{GroupTotal, GroupUserTotal};
use crate::database::Database;

/// Repository for `group_user_totals` and `top_global_groups`.
pub struct LeaderboardRepository {
    group_users: Collection<GroupUserTotal>,
    groups: Collection<GroupTotal>,
}

impl LeaderboardRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            group_users: db.collection("group_user_totals"),
            groups: db.collection("top_global_groups"),
        }
    }

    /// Count one claim for the user and the group.
    pub async fn record_claim(
        &self,
        group_id: i64,
        group_name: Option<&str>,
        user_id: i64,
        username: Option<&str>,
        first_name: &str,
    ) -> Result<()> {
        let options = UpdateOptions::builder().upsert(true).build();

        self.group_users
            .update_one(
                doc! { "user_id": user_id, "group_id": group_id },
                doc! {
                    "$inc": { "count": 1 },
                    "$set": { "username": username, "first_name": first_name },
                },
            )
            .with_options(options.clone())
            .await?;

        self.groups
            .update_one(
                doc! { "group_id": group_id },
                doc! {
                    "$inc": { "count": 1 },
                    "$set": { "group_name": group_name },
                },
            )
            .with_options(options)
            .await?;

        Ok(())
    }

    /// Groups with the most claims.
    pub async fn top_groups(&self, limit: i64) -> Result<Vec<GroupTotal>> {
        let options = FindOptions::builder()
            .sort(doc! { "count": -1 })
            .limit(limit)
            .build();
        let cursor = self.groups.find(doc! {}).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Users with the most claims inside one group.
    pub async fn top_in_group(&self, group_id: i64, limit: i64) -> Result<Vec<GroupUserTotal>> {
        let options = FindOptions::builder()
            .sort(doc! { "count": -1 })
            .limit(limit)
            .build();
        let cursor = self
            .group_users
            .find(doc! { "group_id": group_id })
            .with_options(options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Every group the bot has seen a claim in.
    pub async fn group_ids(&self) -> Result<Vec<i64>> {
        let cursor = self.groups.find(doc! {}).await?;
        let groups: Vec<GroupTotal> = cursor.try_collect().await?;
        Ok(groups.into_iter().map(|g| g.group_id).collect())
    }
}
