//! /marry (and /guess): claim the chat's current spawn.

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode, ReplyParameters};
use tracing::{debug, info};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{utc_day_key, Character};
use crate::game::ClaimOutcome;
use crate::utils::parser::format_min_sec;
use crate::utils::{html_escape, mention_html, reply_html, ReplyExt};

/// Ban notice, in whole days or hours.
fn bonk_notice(remaining: chrono::Duration) -> String {
    let time = if remaining.num_days() > 0 {
        format!("{} days", remaining.num_days())
    } else {
        format!("{} hours", remaining.num_hours())
    };
    format!("🔨 You've been bonked for spamming too much.. please wait for <b>{time}</b>")
}

fn success_text(user_id: i64, first_name: &str, character: &Character) -> String {
    format!(
        "<b>{}</b> You Guessed a New Character ✅️\n\n\
        <b>NAME:</b> <b>{}</b>\n\
        <b>ANIME:</b> <b>{}</b>\n\
        <b>RARITY:</b> <b>{} {}</b>\n\n\
        This Character added in Your harem.. use /harem To see your harem",
        mention_html(user_id, first_name),
        html_escape(&character.name),
        html_escape(&character.anime),
        character.rarity.emoji(),
        character.rarity,
    )
}

/// Handle /marry <name>.
pub async fn marry_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;

    if let Some(ban) = state.bans.active_ban(user_id).await? {
        reply_html(&bot, &msg, bonk_notice(ban.remaining(Utc::now()))).await?;
        return Ok(());
    }

    if let Some(left) = state.spam.remaining(user_id) {
        let text = format!(
            "🚫 <b>You are temporarily blocked!</b>\n\n\
            ⏰ <b>Time remaining:</b> {}\n\n\
            You cannot claim characters while blocked for spam.\n\
            Please wait for your block to expire.",
            format_min_sec(left.as_secs())
        );
        reply_html(&bot, &msg, text).await?;
        return Ok(());
    }

    let today = utc_day_key(Utc::now());
    let limit = state.config.daily_marry_limit;
    if let Some(collector) = state.collectors.get(user_id).await? {
        let count = collector.marriages_on(&today);
        if count >= limit {
            let text = format!(
                "💒 <b>Daily Marriage Limit Reached!</b>\n\n\
                ❌ You've already married <b>{count}/{limit}</b> characters today.\n\n\
                ⏰ <b>Reset time:</b> Tomorrow at 00:00 UTC\n\n\
                Come back tomorrow to continue building your harem!"
            );
            reply_html(&bot, &msg, text).await?;
            return Ok(());
        }
    }

    let guess = msg.arg_text().to_lowercase();

    let character = match state.game.try_claim(chat_id.0, user_id, &guess).await {
        ClaimOutcome::Claimed(character) => character,
        ClaimOutcome::NoSpawn => {
            reply_html(
                &bot,
                &msg,
                "🚫 No character has been summoned yet!\n\n\
                Characters appear automatically as the chat gets active, \
                or admins can use /summon to spawn one manually.",
            )
            .await?;
            return Ok(());
        }
        ClaimOutcome::AlreadyClaimed => {
            reply_html(&bot, &msg, "❌️ Already Guessed By Someone.. Try Next Time").await?;
            return Ok(());
        }
        ClaimOutcome::Rejected => {
            reply_html(&bot, &msg, "Nahh You Can't use This Types of words in your guess..❌️")
                .await?;
            return Ok(());
        }
        ClaimOutcome::WrongName => {
            debug!("Wrong guess in chat {} by {}", chat_id, user_id);
            reply_html(&bot, &msg, "Please Write Correct Character Name... ❌️").await?;
            return Ok(());
        }
    };

    let username = user.username.as_deref();
    state
        .collectors
        .add_card(user_id, username, &user.first_name, &character, Some(&today))
        .await?;

    if msg.chat.is_group() || msg.chat.is_supergroup() {
        state
            .leaderboard
            .record_claim(chat_id.0, msg.chat.title(), user_id, username, &user.first_name)
            .await?;
    }

    info!("User {} married {} in chat {}", user_id, character.id, chat_id);

    let keyboard = InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::switch_inline_query_current_chat(
            "See Harem",
            format!("collection.{user_id}"),
        ),
    ]]);

    bot.send_message(chat_id, success_text(user_id, &user.first_name, &character))
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .reply_markup(keyboard)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Rarity;

    #[test]
    fn test_bonk_notice_units() {
        assert!(bonk_notice(chrono::Duration::hours(50)).contains("2 days"));
        assert!(bonk_notice(chrono::Duration::hours(5)).contains("5 hours"));
    }

    #[test]
    fn test_success_text_escapes() {
        let c = Character::new("7", "Tom & Jerry", "Cartoons", Rarity::Epic, "u");
        let text = success_text(1, "Ann", &c);
        assert!(text.contains("Tom &amp; Jerry"));
        assert!(text.contains("🟣 Epic"));
    }
}
