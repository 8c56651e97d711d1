//! Per-chat spawn settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    pub chat_id: i64,

    /// Messages between automatic spawns.
    pub message_frequency: u32,
}

impl ChatSettings {
    pub fn new(chat_id: i64, message_frequency: u32) -> Self {
        Self {
            chat_id,
            message_frequency,
        }
    }
}
