//! /start command plugin.
//!
//! Sends the welcome message and remembers users who start the bot in PM,
//! so broadcasts can reach them.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use tracing::debug;

use super::help;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::PmUser;
use crate::utils::html_escape;

/// Handle the /start command with an optional deep link.
pub async fn start_handler(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    args: String,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;

    if msg.chat.is_private()
        && let Some(user) = &msg.from
    {
        let pm_user = PmUser {
            id: user.id.0 as i64,
            first_name: user.first_name.clone(),
            username: user.username.clone(),
        };
        state.pm_users.record(&pm_user).await?;
        debug!("Recorded PM user {}", pm_user.id);
    }

    if args.trim() == "help" {
        return help::send_help_menu(&bot, chat_id).await;
    }

    if !msg.chat.is_private() {
        bot.send_message(chat_id, "🎴 I'm alive! Chat here and characters will appear.")
            .await?;
        return Ok(());
    }

    let name = msg
        .from
        .as_ref()
        .map(|u| html_escape(&u.first_name))
        .unwrap_or_default();

    let welcome_text = format!(
        "✨ <b>Hey {name}!</b>\n\n\
        I'm a character collector bot. Add me to a group and characters will \
        spawn while people chat. The first one to guess the name with \
        <code>/marry</code> gets to keep it.\n\n\
        Use /help to see every command."
    );

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::url(
            "➕ Add me to your group",
            format!("https://t.me/{}?startgroup=new", state.bot_username).parse()?,
        )],
        vec![
            InlineKeyboardButton::url(
                "💬 Support",
                format!("https://t.me/{}", state.config.support_chat).parse()?,
            ),
            InlineKeyboardButton::url(
                "📢 Updates",
                format!("https://t.me/{}", state.config.update_chat).parse()?,
            ),
        ],
        vec![InlineKeyboardButton::callback("📚 Help", "help:main")],
    ]);

    bot.send_message(chat_id, welcome_text)
        .parse_mode(ParseMode::Html)
        .reply_markup(keyboard)
        .await?;

    Ok(())
}
