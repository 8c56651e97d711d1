//! Themed spawn events.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Only one event is active at a time. While active, only characters
/// whose name contains `filter_emoji` spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSettings {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub event_type: String,
    pub active: bool,
    pub filter_emoji: String,

    pub started_at: String,
    pub started_by: i64,
    pub started_by_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_by: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_by_name: Option<String>,
}

impl EventSettings {
    pub const CHRISTMAS: &'static str = "christmas";
    pub const CHRISTMAS_EMOJI: &'static str = "🎄";

    pub fn christmas(started_by: i64, started_by_name: impl Into<String>) -> Self {
        Self {
            id: None,
            event_type: Self::CHRISTMAS.to_string(),
            active: true,
            filter_emoji: Self::CHRISTMAS_EMOJI.to_string(),
            started_at: now_stamp(),
            started_by,
            started_by_name: started_by_name.into(),
            ended_at: None,
            ended_by: None,
            ended_by_name: None,
        }
    }
}

/// Human readable timestamp stored on events.
pub fn now_stamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
