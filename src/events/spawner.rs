//! Choosing and posting spawns.

use std::collections::HashSet;

use teloxide::prelude::*;
use tracing::{info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{Character, Rarity};
use crate::game::spawn::{pick_spawn, pick_star};
use crate::game::state::ChatGame;
use crate::utils::card::send_card;

pub const STAR_CAPTION: &str =
    "⭐ A shining STAR beauty has appeared! Use /marry to add them to your harem!";

pub fn spawn_caption(rarity: Rarity) -> String {
    format!(
        "{} A beauty has been summoned! Use /marry to add them to your harem!",
        rarity.emoji()
    )
}

/// Characters that may appear in normal spawns and summons.
///
/// Star and Custom cards never spawn here, locked cards are skipped and an
/// active event keeps only names containing its emoji.
pub fn eligible(
    catalogue: &[Character],
    locked: &HashSet<String>,
    event_emoji: Option<&str>,
) -> Vec<Character> {
    catalogue
        .iter()
        .filter(|c| !matches!(c.rarity, Rarity::Star | Rarity::Custom))
        .filter(|c| !locked.contains(&c.id))
        .filter(|c| event_emoji.is_none_or(|emoji| c.name.contains(emoji)))
        .cloned()
        .collect()
}

/// Unlocked Star cards for the star chat.
pub fn star_pool(catalogue: &[Character], locked: &HashSet<String>) -> Vec<Character> {
    catalogue
        .iter()
        .filter(|c| c.rarity == Rarity::Star && !locked.contains(&c.id))
        .cloned()
        .collect()
}

/// Current spawn candidates, honouring locks and the active event.
pub async fn spawn_pool(state: &AppState) -> anyhow::Result<Vec<Character>> {
    let catalogue = state.characters.all().await?;
    let locked = state.spawn_locks.locked_ids().await?;
    let event = state.events.active().await?;
    let emoji = event.as_ref().map(|e| e.filter_emoji.as_str());

    Ok(eligible(&catalogue, &locked, emoji))
}

/// Pick a character with `weight` and make it the chat's current spawn.
/// Returns None when nothing is eligible.
pub async fn choose_spawn(
    state: &AppState,
    chat_id: ChatId,
    game: &mut ChatGame,
    weight: fn(Rarity) -> f64,
    manual: bool,
) -> anyhow::Result<Option<Character>> {
    let pool = spawn_pool(state).await?;
    let recent = state.game.recent(chat_id.0);

    let picked = {
        let mut rng = rand::thread_rng();
        pick_spawn(&pool, weight, &recent, &mut rng).cloned()
    };

    let Some(character) = picked else {
        warn!("No spawnable characters for chat {}", chat_id);
        return Ok(None);
    };

    game.set_spawn(character.clone(), manual);
    state.game.remember_spawn(chat_id.0, &character.id);
    info!(
        "Spawned {} ({}) in chat {}{}",
        character.id,
        character.rarity,
        chat_id,
        if manual { " by summon" } else { "" }
    );
    Ok(Some(character))
}

/// Automatic spawn after the chat's message counter fired.
pub async fn spawn_in_chat(
    bot: &ThrottledBot,
    state: &AppState,
    chat_id: ChatId,
    game: &mut ChatGame,
) -> anyhow::Result<()> {
    if let Some(character) =
        choose_spawn(state, chat_id, game, Rarity::spawn_weight, false).await?
    {
        send_card(bot, chat_id, &character, &spawn_caption(character.rarity), None, None).await?;
    }
    Ok(())
}

/// Star spawn in the star chat.
pub async fn spawn_star(
    bot: &ThrottledBot,
    state: &AppState,
    chat_id: ChatId,
    game: &mut ChatGame,
) -> anyhow::Result<()> {
    let catalogue = state.characters.all().await?;
    let locked = state.spawn_locks.locked_ids().await?;
    let stars = star_pool(&catalogue, &locked);

    let picked = state.game.with_star_sent(|sent| {
        let mut rng = rand::thread_rng();
        pick_star(&stars, sent, &mut rng).cloned()
    });

    let Some(character) = picked else {
        warn!("No unlocked Star characters to spawn");
        return Ok(());
    };

    game.set_spawn(character.clone(), false);
    info!("Star {} spawned in chat {}", character.id, chat_id);
    send_card(bot, chat_id, &character, STAR_CAPTION, None, None).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue() -> Vec<Character> {
        vec![
            Character::new("1", "Rem", "Re Zero", Rarity::Common, "u"),
            Character::new("2", "Santa Rem 🎄", "Re Zero", Rarity::Rare, "u"),
            Character::new("3", "Emilia", "Re Zero", Rarity::Star, "u"),
            Character::new("4", "Mine", "Custom", Rarity::Custom, "u"),
            Character::new("5", "Ram", "Re Zero", Rarity::Zenith, "u"),
        ]
    }

    fn ids(chars: &[Character]) -> Vec<&str> {
        chars.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_eligible_skips_star_custom_and_locked() {
        let locked: HashSet<String> = ["5".to_string()].into();
        let pool = eligible(&catalogue(), &locked, None);
        assert_eq!(ids(&pool), vec!["1", "2"]);
    }

    #[test]
    fn test_eligible_applies_event_filter() {
        let pool = eligible(&catalogue(), &HashSet::new(), Some("🎄"));
        assert_eq!(ids(&pool), vec!["2"]);
    }

    #[test]
    fn test_star_pool() {
        let locked: HashSet<String> = ["3".to_string()].into();
        assert_eq!(ids(&star_pool(&catalogue(), &HashSet::new())), vec!["3"]);
        assert!(star_pool(&catalogue(), &locked).is_empty());
    }

    #[test]
    fn test_spawn_caption_has_rarity_emoji() {
        assert!(spawn_caption(Rarity::Rare).starts_with("🔵"));
    }
}
