//! Help command module.
//!
//! Handles /help command and callback queries for the interactive help system.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};

use crate::bot::dispatcher::{AppState, ThrottledBot};

mod admin;
mod game;
mod main_help;
mod owner;
mod trade;
mod upload;

/// Handle /help command.
pub async fn help_handler(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let chat_id = msg.chat.id;

    // In groups, redirect to PM
    if msg.chat.is_group() || msg.chat.is_supergroup() {
        let pm_url = format!("https://t.me/{}?start=help", state.bot_username);
        let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
            "📚 Help",
            pm_url.parse()?,
        )]]);
        bot.send_message(chat_id, "Contact me in PM for help.")
            .reply_markup(keyboard)
            .await?;
        return Ok(());
    }

    send_help_menu(&bot, chat_id).await
}

/// Send the main help menu.
pub async fn send_help_menu(bot: &ThrottledBot, chat_id: ChatId) -> anyhow::Result<()> {
    bot.send_message(chat_id, main_help::get_text())
        .parse_mode(ParseMode::Html)
        .reply_markup(main_help::get_keyboard())
        .await?;

    Ok(())
}

/// Handle help callback queries (help:*).
pub async fn callback_handler(bot: ThrottledBot, q: CallbackQuery) -> anyhow::Result<()> {
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };

    let Some(part) = data.strip_prefix("help:") else {
        return Ok(());
    };

    let (text, keyboard) = match part {
        "main" | "back" => (main_help::get_text().to_string(), main_help::get_keyboard()),
        "game" => (game::get_text(), game::get_keyboard()),
        "trade" => (trade::get_text(), trade::get_keyboard()),
        "upload" => (upload::get_text(), upload::get_keyboard()),
        "admin" => (admin::get_text(), admin::get_keyboard()),
        "owner" => (owner::get_text(), owner::get_keyboard()),
        _ => return Ok(()),
    };

    if let Some(msg) = &q.message {
        bot.edit_message_text(msg.chat().id, msg.id(), text)
            .parse_mode(ParseMode::Html)
            .reply_markup(keyboard)
            .await?;
    }

    bot.answer_callback_query(&q.id).await?;
    Ok(())
}
