//! Spawn locks and the rarity table: /lockspawn, /unlockspawn,
//! /lockedspawns and /rarity.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, ReplyParameters};
use tracing::info;

use super::NOT_SUDO;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{LockedSpawn, Rarity};
use crate::utils::{format_username, html_escape, paginate, reply_html, ReplyExt};

/// Locked characters per `/lockedspawns` page.
const LOCKS_PER_PAGE: usize = 20;

/// Spawn chance in percent for every tier with a non-zero weight.
pub fn rarity_table(weight: fn(Rarity) -> f64) -> Vec<(Rarity, f64)> {
    let total: f64 = Rarity::ALL.iter().map(|r| weight(*r)).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    Rarity::ALL
        .iter()
        .filter(|r| weight(**r) > 0.0)
        .map(|r| (*r, weight(*r) * 100.0 / total))
        .collect()
}

fn rarity_text(spawn_frequency: u32, star_frequency: u32) -> String {
    let mut text = format!(
        "🌟 <b>Character Rarity System</b> 🌟\n\n\
        📊 <b>Regular Spawns (every {spawn_frequency} messages by default):</b>\n"
    );
    for (rarity, chance) in rarity_table(Rarity::spawn_weight) {
        text.push_str(&format!("{} <b>{}:</b> {:.2}% chance\n", rarity.emoji(), rarity, chance));
    }

    text.push_str(&format!(
        "\n🔥 <b>Special Spawns:</b>\n\
        {} <b>{}:</b> only in the star chat, every {} messages\n\
        {} <b>{}:</b> boosted in /summon\n\n\
        ❌ <b>Non-Spawning Rarities:</b>\n\
        {} <b>{}:</b> never spawns\n\n\
        💡 <b>Tips:</b>\n\
        • Higher rarity = lower spawn chance\n\
        • Use /lockspawn to prevent specific cards from spawning (admin only)\n\n\
        ✨ Good luck collecting!",
        Rarity::Star.emoji(),
        Rarity::Star,
        star_frequency,
        Rarity::Retro.emoji(),
        Rarity::Retro,
        Rarity::Custom.emoji(),
        Rarity::Custom,
    ));
    text
}

/// Handle /rarity.
pub async fn rarity_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let text = rarity_text(state.config.spawn_frequency, state.config.star_frequency);
    reply_html(&bot, &msg, text).await?;
    Ok(())
}

fn lock_details(name: &str, anime: &str, id: &str) -> String {
    format!(
        "🎴 <b>Character:</b> {}\n\
        📺 <b>Anime:</b> {}\n\
        🆔 <b>ID:</b> <code>{}</code>",
        html_escape(name),
        html_escape(anime),
        html_escape(id)
    )
}

/// Handle /lockspawn id.
pub async fn lockspawn_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;

    if !state.permissions.is_sudo(user_id) {
        reply_html(&bot, &msg, NOT_SUDO).await?;
        return Ok(());
    }

    let args = msg.args();
    let [character_id] = args.as_slice() else {
        reply_html(
            &bot,
            &msg,
            "📝 <b>Lock Spawn Usage:</b>\n\n\
            <code>/lockspawn [character_id]</code>\n\n\
            <b>Example:</b> <code>/lockspawn 123</code>\n\n\
            This will prevent the character from appearing in spawns.",
        )
        .await?;
        return Ok(());
    };

    let Some(character) = state.characters.get(character_id).await? else {
        reply_html(
            &bot,
            &msg,
            format!("❌ Character with ID <code>{}</code> not found!", html_escape(character_id)),
        )
        .await?;
        return Ok(());
    };

    let locked_by = format_username(user.username.as_deref(), &user.first_name);
    let lock = LockedSpawn::new(&character, user_id, Some(locked_by));
    let details = lock_details(&character.name, &character.anime, &character.id);

    if !state.spawn_locks.lock(&lock).await? {
        reply_html(
            &bot,
            &msg,
            format!(
                "⚠️ <b>Already Locked!</b>\n\n{details}\n\n\
                This character is already locked from spawning."
            ),
        )
        .await?;
        return Ok(());
    }

    info!("User {} locked {} from spawning", user_id, character.id);

    reply_html(
        &bot,
        &msg,
        format!(
            "🔒 <b>Spawn Locked!</b>\n\n\
            {details}\n\
            🌟 <b>Rarity:</b> {} {}\n\n\
            ✅ This character will no longer appear in spawns.",
            character.rarity.emoji(),
            character.rarity
        ),
    )
    .await?;
    Ok(())
}

/// Handle /unlockspawn id.
pub async fn unlockspawn_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    if !state.permissions.is_sudo(user_id) {
        reply_html(&bot, &msg, NOT_SUDO).await?;
        return Ok(());
    }

    let args = msg.args();
    let [character_id] = args.as_slice() else {
        reply_html(
            &bot,
            &msg,
            "📝 <b>Unlock Spawn Usage:</b>\n\n\
            <code>/unlockspawn [character_id]</code>\n\n\
            <b>Example:</b> <code>/unlockspawn 123</code>\n\n\
            This will allow the character to appear in spawns again.",
        )
        .await?;
        return Ok(());
    };

    let Some(lock) = state.spawn_locks.unlock(character_id).await? else {
        reply_html(
            &bot,
            &msg,
            format!(
                "❌ Character with ID <code>{}</code> is not currently locked!",
                html_escape(character_id)
            ),
        )
        .await?;
        return Ok(());
    };

    info!("User {} unlocked {}", user_id, lock.character_id);

    reply_html(
        &bot,
        &msg,
        format!(
            "🔓 <b>Spawn Unlocked!</b>\n\n{}\n\n\
            ✅ This character can now appear in spawns again.",
            lock_details(&lock.character_name, &lock.anime, &lock.character_id)
        ),
    )
    .await?;
    Ok(())
}

/// One page of the lock list, grouped by rarity.
pub fn render_locks(locks: &[LockedSpawn], page: usize) -> (String, Option<InlineKeyboardMarkup>) {
    let page = paginate(locks.len(), page, LOCKS_PER_PAGE);
    let shown = &locks[page.start..page.end];

    let mut text = format!(
        "🔒 <b>Locked Spawn Characters</b> - Page {}/{}\n",
        page.index + 1,
        page.total
    );

    for rarity in Rarity::DISPLAY_ORDER {
        let mut group = shown.iter().filter(|l| l.rarity == rarity).peekable();
        if group.peek().is_none() {
            continue;
        }
        text.push_str(&format!("\n{} <b>{}:</b>\n", rarity.emoji(), rarity));
        for lock in group {
            text.push_str(&format!(
                "• <code>{}</code> - {} ({})\n",
                html_escape(&lock.character_id),
                html_escape(&lock.character_name),
                html_escape(&lock.anime)
            ));
        }
    }

    text.push_str(&format!("\n📊 <b>Total Locked:</b> {} characters", locks.len()));

    let mut buttons = Vec::new();
    if page.index > 0 {
        buttons.push(InlineKeyboardButton::callback(
            "⬅️ Previous",
            format!("lockedspawns:{}", page.index - 1),
        ));
    }
    if page.index + 1 < page.total {
        buttons.push(InlineKeyboardButton::callback(
            "Next ➡️",
            format!("lockedspawns:{}", page.index + 1),
        ));
    }

    let keyboard = (!buttons.is_empty()).then(|| InlineKeyboardMarkup::new(vec![buttons]));
    (text, keyboard)
}

const NO_LOCKS: &str =
    "🔓 <b>No Locked Spawns</b>\n\nThere are currently no characters locked from spawning.";

/// Handle /lockedspawns.
pub async fn lockedspawns_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let locks = state.spawn_locks.list().await?;
    if locks.is_empty() {
        reply_html(&bot, &msg, NO_LOCKS).await?;
        return Ok(());
    }

    let (text, keyboard) = render_locks(&locks, 0);
    let mut req = bot
        .send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id));
    if let Some(keyboard) = keyboard {
        req = req.reply_markup(keyboard);
    }
    req.await?;
    Ok(())
}

/// Handle lockedspawns:<page> buttons.
pub async fn lockedspawns_callback(bot: ThrottledBot, q: CallbackQuery, state: AppState) -> anyhow::Result<()> {
    let page = q
        .data
        .as_deref()
        .and_then(|d| d.strip_prefix("lockedspawns:"))
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(0);

    let locks = state.spawn_locks.list().await?;
    if locks.is_empty() {
        bot.answer_callback_query(&q.id)
            .text("No locked spawns available!")
            .show_alert(true)
            .await?;
        return Ok(());
    }

    let (text, keyboard) = render_locks(&locks, page);
    if let Some(message) = &q.message {
        let mut req = bot
            .edit_message_text(message.chat().id, message.id(), text)
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            req = req.reply_markup(keyboard);
        }
        req.await?;
    }

    bot.answer_callback_query(&q.id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Character;

    fn lock(id: usize, rarity: Rarity) -> LockedSpawn {
        let c = Character::new(id.to_string(), format!("Card {id}"), "Anime", rarity, "u");
        LockedSpawn::new(&c, 1, None)
    }

    #[test]
    fn test_rarity_table_sums_to_hundred() {
        let table = rarity_table(Rarity::spawn_weight);
        let total: f64 = table.iter().map(|(_, p)| p).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!(table.iter().all(|(r, _)| *r != Rarity::Star && *r != Rarity::Custom));
        assert!(rarity_text(100, 200).contains("every 200 messages"));
    }

    #[test]
    fn test_render_locks_groups_by_rarity() {
        let locks = vec![lock(1, Rarity::Common), lock(2, Rarity::Zenith)];
        let (text, keyboard) = render_locks(&locks, 0);
        assert!(keyboard.is_none());
        assert!(text.contains("Page 1/1"));
        let zenith = text.find("Zenith").unwrap();
        let common = text.find("Common").unwrap();
        assert!(zenith < common);
        assert!(text.contains("Total Locked:</b> 2 characters"));
    }

    #[test]
    fn test_render_locks_pages() {
        let locks: Vec<LockedSpawn> = (0..45).map(|i| lock(i, Rarity::Rare)).collect();
        let (text, keyboard) = render_locks(&locks, 1);
        assert!(text.contains("Page 2/3"));
        assert_eq!(keyboard.unwrap().inline_keyboard[0].len(), 2);

        let (_, last) = render_locks(&locks, 9);
        assert_eq!(last.unwrap().inline_keyboard[0].len(), 1);
    }
}
