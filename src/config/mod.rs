//! Configuration module for the collector bot.
//!
//! Loads configuration from environment variables.

use serde::Deserialize;
use std::env;

/// Bot running mode
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub webhook_port: u16,

    /// Bot username (without @).
    /// Optional - will be fetched via getMe if not set.
    pub bot_username: Option<String>,

    /// Owners: manage uploaders and broadcast. Always sudo.
    pub owner_ids: Vec<u64>,

    /// Sudo users: catalogue and spawn administration.
    pub sudo_ids: Vec<u64>,

    /// Level 1 uploaders configured statically.
    pub uploader_ids: Vec<u64>,

    /// Channel where uploaded cards are posted.
    pub chara_channel_id: Option<i64>,

    pub support_chat: String,
    pub update_chat: String,

    /// The one chat that receives Star spawns.
    pub star_chat_id: Option<i64>,

    // Game tuning
    pub spawn_frequency: u32,
    pub star_frequency: u32,
    pub daily_marry_limit: u32,

    // MongoDB
    pub mongodb_uri: String,
    pub mongodb_database: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if required environment variables are not set.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let bot_mode = match env_or("BOT_MODE", "polling").to_lowercase().as_str() {
            "webhook" => BotMode::Webhook,
            _ => BotMode::Polling,
        };

        let webhook_url = env::var("WEBHOOK_URL").ok().filter(|s| !s.is_empty());

        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            panic!("WEBHOOK_URL must be set when BOT_MODE is webhook");
        }

        let owner_ids = env::var("OWNER_IDS")
            .or_else(|_| env::var("OWNER_ID"))
            .map(|s| parse_id_list(&s))
            .unwrap_or_default();

        let bot_username = env::var("BOT_USERNAME")
            .ok()
            .map(|s| s.trim_start_matches('@').to_string())
            .filter(|s| !s.is_empty());

        let bot_token = env::var("BOT_TOKEN")
            .or_else(|_| env::var("TELEGRAM_BOT_TOKEN"))
            .expect("BOT_TOKEN must be set");

        let mongodb_uri = env::var("MONGODB_URI")
            .or_else(|_| env::var("MONGODB_URL"))
            .expect("MONGODB_URI must be set");

        Self {
            bot_token,
            bot_mode,
            webhook_url,
            webhook_secret: env::var("WEBHOOK_SECRET").ok().filter(|s| !s.is_empty()),
            webhook_port: parse_or("PORT", 10_000),
            bot_username,
            owner_ids,
            sudo_ids: parse_id_list(&env_or("SUDO_USERS", "")),
            uploader_ids: parse_id_list(&env_or("UPLOADING_USERS", "")),
            chara_channel_id: env::var("CHARA_CHANNEL_ID")
                .ok()
                .and_then(|s| s.trim().parse().ok()),
            support_chat: env_or("SUPPORT_CHAT", "Collect_em_support"),
            update_chat: env_or("UPDATE_CHAT", "Collect_em_support"),
            star_chat_id: env::var("STAR_CHAT_ID")
                .ok()
                .and_then(|s| s.trim().parse().ok()),
            spawn_frequency: parse_or("SPAWN_FREQUENCY", 100).max(1),
            star_frequency: parse_or("STAR_FREQUENCY", 200).max(1),
            daily_marry_limit: parse_or("DAILY_MARRY_LIMIT", 30),
            mongodb_uri,
            mongodb_database: env_or("MONGODB_DATABASE", "collectem"),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Parse a comma separated list of Telegram ids, skipping garbage entries.
pub fn parse_id_list(raw: &str) -> Vec<u64> {
    raw.split(',')
        .filter_map(|s| {
            // OWNER_ID is sometimes set with trailing notes, keep the digits only
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u64>().ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1, 2,3"), vec![1, 2, 3]);
        assert_eq!(parse_id_list(""), Vec::<u64>::new());
        assert_eq!(parse_id_list("42 (main owner),abc,7"), vec![42, 7]);
    }
}
