//! Uploaders granted at runtime by owners.

use serde::{Deserialize, Serialize};

/// An uploader added with `/adduploader` or `/promote`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Uploader {
    pub user_id: i64,

    /// 1..=3; higher levels may upload rarer tiers.
    pub level: u8,

    #[serde(default)]
    pub added_by: Option<i64>,

    /// Unix timestamp.
    #[serde(default)]
    pub added_at: Option<i64>,
}

impl Uploader {
    pub fn new(user_id: i64, level: u8, added_by: i64) -> Self {
        Self {
            user_id,
            level,
            added_by: Some(added_by),
            added_at: Some(chrono::Utc::now().timestamp()),
        }
    }
}
