//! Collectem - Telegram character collector game.
//!
//! Characters spawn in active group chats and the first user to guess the
//! name adds the card to their collection.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `database` - MongoDB models and repositories
//! - `cache` - LRU-based caching with Moka
//! - `permissions` - Owner, sudo and uploader checks
//! - `game` - Spawn selection, guess arbitration and spam tracking
//! - `bot` - Dispatcher and polling/webhook runtime (with Throttle)
//! - `plugins` - Command and callback handlers
//! - `events` - Message counter that drives spawns
//! - `utils` - Utility functions

mod bot;
mod cache;
mod config;
mod database;
mod events;
mod game;
mod permissions;
mod plugins;
mod utils;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cache::CacheRegistry;
use config::Config;
use database::Database;
use plugins::Command;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("collectem=info,teloxide=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Collectem bot...");

    // Also loads .env
    let config = Arc::new(Config::from_env());
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);

    info!("Connecting to MongoDB...");
    let db = Database::connect(&config.mongodb_uri, &config.mongodb_database).await?;
    info!("Database connected");

    let cache = CacheRegistry::new();

    // Throttle keeps us inside Telegram's global and per-chat limits
    let bot = Bot::new(&config.bot_token).throttle(Limits::default());

    let me = bot.get_me().await?;
    let bot_username = config
        .bot_username
        .clone()
        .unwrap_or_else(|| me.username().to_string());
    info!("Using bot username: @{}", bot_username);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }

    if config.owner_ids.is_empty() {
        warn!("No owner IDs configured (OWNER_IDS is empty)");
    } else {
        info!("Bot owners: {:?}", config.owner_ids);
    }

    let state = bot::AppState::new(config.clone(), &db, &cache, bot_username);
    let dispatcher = bot::build_dispatcher(bot.clone(), state);

    bot::run(&config, bot, dispatcher).await
}
