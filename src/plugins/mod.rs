//! Plugin system for command handlers.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Adding the handler to `command_handler()`

pub mod bonk;
pub mod broadcast;
pub mod changetime;
pub mod event;
pub mod find;
pub mod give;
pub mod harem;
pub mod help;
pub mod leaderboard;
pub mod marry;
pub mod ping;
pub mod spawnlock;
pub mod start;
pub mod summon;
pub mod trade;
pub mod upload;
pub mod uploaders;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

/// Reply for sudo-only commands.
pub(crate) const NOT_SUDO: &str = "🚫 This command is only available to administrators.";

/// Reply for owner-only commands.
pub(crate) const NOT_OWNER: &str = "🚫 Only owners can use this command.";

/// All bot commands. Arguments are read from the message text by each
/// handler, the `String` fields only let the command carry them.
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot")]
    Start(String),

    #[command(description = "Show help")]
    Help,

    #[command(description = "Check bot latency")]
    Ping,

    // Game
    #[command(description = "Guess and collect the spawned character")]
    Marry(String),

    #[command(hide)]
    Guess(String),

    #[command(description = "View your collection")]
    Harem(String),

    #[command(hide)]
    Collection(String),

    #[command(description = "Toggle a favourite character")]
    Fav(String),

    #[command(description = "Set harem sorting (rarity or anime)")]
    Sorts(String),

    #[command(description = "Find a character by ID")]
    Find(String),

    #[command(description = "Trade characters (reply)")]
    Trade(String),

    #[command(description = "Gift a character (reply)")]
    Gift(String),

    #[command(description = "Top groups leaderboard")]
    Topgroups,

    #[command(description = "Top collectors in this group")]
    Top,

    #[command(description = "Rarity tiers and spawn rates")]
    Rarity,

    #[command(description = "Current event")]
    Eventstatus,

    // Uploaders
    #[command(hide)]
    Upload(String),

    #[command(hide)]
    Update(String),

    #[command(hide)]
    Edit(String),

    // Sudo
    #[command(hide)]
    Delete(String),

    #[command(hide)]
    Remove(String),

    #[command(hide)]
    Give(String),

    #[command(hide)]
    Summon,

    #[command(hide)]
    Changetime(String),

    #[command(hide)]
    Lockspawn(String),

    #[command(hide)]
    Unlockspawn(String),

    #[command(description = "Characters locked from spawning")]
    Lockedspawns,

    #[command(hide)]
    Startevent,

    #[command(hide)]
    Endevent,

    #[command(hide)]
    Promote(String),

    #[command(hide, rename = "migrate_rarities")]
    Migraterarities,

    #[command(hide)]
    Bonk(String),

    #[command(hide)]
    Unbonk(String),

    // Owners
    #[command(hide)]
    Adduploader(String),

    #[command(hide)]
    Removeuploader(String),

    #[command(hide)]
    Broadcast,
}

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start(args)].endpoint(start::start_handler))
        .branch(case![Command::Help].endpoint(help::help_handler))
        .branch(case![Command::Ping].endpoint(ping::ping_command))
        // Game
        .branch(case![Command::Marry(args)].endpoint(marry::marry_command))
        .branch(case![Command::Guess(args)].endpoint(marry::marry_command))
        .branch(case![Command::Harem(args)].endpoint(harem::harem_command))
        .branch(case![Command::Collection(args)].endpoint(harem::harem_command))
        .branch(case![Command::Fav(args)].endpoint(harem::fav_command))
        .branch(case![Command::Sorts(args)].endpoint(harem::sorts_command))
        .branch(case![Command::Find(args)].endpoint(find::find_command))
        .branch(case![Command::Trade(args)].endpoint(trade::trade_command))
        .branch(case![Command::Gift(args)].endpoint(trade::gift_command))
        .branch(case![Command::Topgroups].endpoint(leaderboard::topgroups_command))
        .branch(case![Command::Top].endpoint(leaderboard::top_command))
        .branch(case![Command::Rarity].endpoint(spawnlock::rarity_command))
        .branch(case![Command::Eventstatus].endpoint(event::eventstatus_command))
        // Catalogue
        .branch(case![Command::Upload(args)].endpoint(upload::upload_command))
        .branch(case![Command::Update(args)].endpoint(upload::update_command))
        .branch(case![Command::Edit(args)].endpoint(upload::update_command))
        .branch(case![Command::Delete(args)].endpoint(upload::delete_command))
        .branch(case![Command::Remove(args)].endpoint(upload::remove_command))
        .branch(case![Command::Migraterarities].endpoint(upload::migrate_command))
        .branch(case![Command::Give(args)].endpoint(give::give_command))
        // Spawns
        .branch(case![Command::Summon].endpoint(summon::summon_command))
        .branch(case![Command::Changetime(args)].endpoint(changetime::changetime_command))
        .branch(case![Command::Lockspawn(args)].endpoint(spawnlock::lockspawn_command))
        .branch(case![Command::Unlockspawn(args)].endpoint(spawnlock::unlockspawn_command))
        .branch(case![Command::Lockedspawns].endpoint(spawnlock::lockedspawns_command))
        .branch(case![Command::Startevent].endpoint(event::startevent_command))
        .branch(case![Command::Endevent].endpoint(event::endevent_command))
        // Moderation
        .branch(case![Command::Bonk(args)].endpoint(bonk::bonk_command))
        .branch(case![Command::Unbonk(args)].endpoint(bonk::unbonk_command))
        .branch(case![Command::Promote(args)].endpoint(uploaders::promote_command))
        .branch(case![Command::Adduploader(args)].endpoint(uploaders::adduploader_command))
        .branch(case![Command::Removeuploader(args)].endpoint(uploaders::removeuploader_command))
        .branch(case![Command::Broadcast].endpoint(broadcast::broadcast_command))
}

/// Build the callback query handler.
pub fn callback_handler() -> UpdateHandler<anyhow::Error> {
    Update::filter_callback_query()
        .branch(
            dptree::filter(|q: CallbackQuery| has_prefix(&q, "harem:"))
                .endpoint(harem::harem_callback),
        )
        .branch(
            dptree::filter(|q: CallbackQuery| has_prefix(&q, "lockedspawns:"))
                .endpoint(spawnlock::lockedspawns_callback),
        )
        .branch(
            dptree::filter(|q: CallbackQuery| has_prefix(&q, "trade:"))
                .endpoint(trade::trade_callback),
        )
        .branch(
            dptree::filter(|q: CallbackQuery| has_prefix(&q, "gift:"))
                .endpoint(trade::gift_callback),
        )
        .branch(dptree::endpoint(help::callback_handler))
}

fn has_prefix(q: &CallbackQuery, prefix: &str) -> bool {
    q.data.as_deref().is_some_and(|d| d.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_rarities_command_name() {
        let parsed = Command::parse("/migrate_rarities", "collectem_bot");
        assert!(matches!(parsed, Ok(Command::Migraterarities)));
        assert!(Command::parse("/migraterarities", "collectem_bot").is_err());
    }

    #[test]
    fn test_guess_is_marry_alias() {
        let parsed = Command::parse("/guess Rem", "collectem_bot");
        assert!(matches!(parsed, Ok(Command::Guess(name)) if name == "Rem"));
    }
}
