//! Users that started the bot in private chat.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PmUser {
    /// Telegram user id, also the private chat id.
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}
