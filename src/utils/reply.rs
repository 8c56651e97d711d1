//! Reply helper utilities.
//!
//! Provides consistent reply behavior across all handlers.

use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode, ReplyParameters, User};

use crate::bot::dispatcher::ThrottledBot;

/// Extension trait for easier reply handling.
pub trait ReplyExt {
    /// Message id to reply to for command responses.
    fn reply_target(&self) -> MessageId;

    /// Sender id as stored in MongoDB.
    fn sender_id(&self) -> Option<i64>;

    /// Whitespace separated arguments after the command word.
    fn args(&self) -> Vec<&str>;

    /// Text after the command word, untrimmed inside.
    fn arg_text(&self) -> &str;

    /// Author of the message this one replies to.
    fn replied_user(&self) -> Option<&User>;
}

impl ReplyExt for Message {
    fn reply_target(&self) -> MessageId {
        self.id
    }

    fn sender_id(&self) -> Option<i64> {
        self.from.as_ref().map(|u| u.id.0 as i64)
    }

    fn args(&self) -> Vec<&str> {
        self.arg_text().split_whitespace().collect()
    }

    fn arg_text(&self) -> &str {
        let text = self.text().or_else(|| self.caption()).unwrap_or_default();
        text.split_once(char::is_whitespace)
            .map(|(_, rest)| rest.trim())
            .unwrap_or_default()
    }

    fn replied_user(&self) -> Option<&User> {
        self.reply_to_message().and_then(|r| r.from.as_ref())
    }
}

/// Reply to a command with HTML text.
pub async fn reply_html(
    bot: &ThrottledBot,
    msg: &Message,
    text: impl Into<String>,
) -> anyhow::Result<Message> {
    let sent = bot
        .send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.reply_target()))
        .await?;
    Ok(sent)
}
