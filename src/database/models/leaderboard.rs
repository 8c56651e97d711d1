//! Claim totals per group and per user-in-group.

use serde::{Deserialize, Serialize};

/// Claims a user made inside one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupUserTotal {
    pub user_id: i64,
    pub group_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub count: i64,
}

/// Claims made inside a group, across all users.
///
/// Also the list of groups `/broadcast` reaches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupTotal {
    pub group_id: i64,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub count: i64,
}
