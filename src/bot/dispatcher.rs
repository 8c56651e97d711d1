//! Message dispatcher setup.
//!
//! Builds the dispatcher with all command handlers and event handlers.

use std::sync::Arc;

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::debug;

use crate::cache::CacheRegistry;
use crate::config::Config;
use crate::database::{
    BanRepository, CharacterRepository, ChatSettingsRepository, CollectorRepository, Database,
    EventRepository, LeaderboardRepository, PmUserRepository, SpawnLockRepository,
    UploaderRepository,
};
use crate::events;
use crate::game::{GameState, PendingGifts, PendingTrades, SpamGuard};
use crate::permissions::{Permissions, Roles};
use crate::plugins;
use crate::utils::media::media_client;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Role and uploader level checks.
    pub permissions: Permissions,

    pub characters: Arc<CharacterRepository>,
    pub collectors: Arc<CollectorRepository>,
    pub leaderboard: Arc<LeaderboardRepository>,
    pub chat_settings: Arc<ChatSettingsRepository>,
    pub spawn_locks: Arc<SpawnLockRepository>,
    pub uploaders: Arc<UploaderRepository>,
    pub events: Arc<EventRepository>,
    pub bans: Arc<BanRepository>,
    pub pm_users: Arc<PmUserRepository>,

    /// Per-chat spawn and claim state.
    pub game: GameState,
    pub spam: SpamGuard,
    pub trades: PendingTrades,
    pub gifts: PendingGifts,

    /// Client for media URL checks.
    pub http: reqwest::Client,

    /// Bot username (without @).
    pub bot_username: String,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: Arc<Config>,
        db: &Database,
        cache: &CacheRegistry,
        bot_username: String,
    ) -> Self {
        let uploaders = Arc::new(UploaderRepository::new(db));
        let permissions = Permissions::new(Roles::from_config(&config), uploaders.clone(), cache);

        let state = Self {
            permissions,
            characters: Arc::new(CharacterRepository::new(db, cache)),
            collectors: Arc::new(CollectorRepository::new(db)),
            leaderboard: Arc::new(LeaderboardRepository::new(db)),
            chat_settings: Arc::new(ChatSettingsRepository::new(db, cache)),
            spawn_locks: Arc::new(SpawnLockRepository::new(db, cache)),
            uploaders,
            events: Arc::new(EventRepository::new(db, cache)),
            bans: Arc::new(BanRepository::new(db)),
            pm_users: Arc::new(PmUserRepository::new(db)),
            game: GameState::new(),
            spam: SpamGuard::new(),
            trades: PendingTrades::default(),
            gifts: PendingGifts::default(),
            http: media_client(),
            bot_username,
            config,
        };

        debug!("Caches: {:?}", cache.cache_names());
        state
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: ThrottledBot,
    state: AppState,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::dispatching::UpdateFilterExt;

    // Commands first; everything else feeds the spawn counter
    let message_handler = Update::filter_message()
        .branch(plugins::command_handler())
        .branch(events::message_event_handler());

    let inline_handler = Update::filter_inline_query().endpoint(plugins::harem::inline_query);

    dptree::entry()
        .branch(message_handler)
        .branch(plugins::callback_handler())
        .branch(inline_handler)
}
