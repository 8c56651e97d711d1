//! Message counter.
//!
//! Counts group messages per chat and spawns a character every
//! `message_frequency` messages. Spammers are blocked and do not count.

use teloxide::prelude::*;
use tracing::{debug, warn};

use super::spawner::{spawn_in_chat, spawn_star};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::game::spam::BLOCK_DURATION;
use crate::game::SpamCheck;
use crate::utils::{reply_html, ReplyExt};

fn spam_notice() -> String {
    format!(
        "⚠️ <b>Spam Detected!</b> ⚠️\n\n\
        You've been temporarily blocked for sending too many messages quickly.\n\
        🚫 <b>Block Duration:</b> {} minutes\n\n\
        During this time, you cannot:\n\
        • Claim characters (/marry)\n\
        • Contribute to character spawns\n\n\
        Please slow down your messaging!",
        BLOCK_DURATION.as_secs() / 60
    )
}

/// Handle a non-command group message.
pub async fn message_counter(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    match state.spam.record(user_id) {
        SpamCheck::Allowed => {}
        SpamCheck::JustBlocked => {
            warn!("User {} blocked for spam in chat {}", user_id, msg.chat.id);
            reply_html(&bot, &msg, spam_notice()).await?;
            return Ok(());
        }
        SpamCheck::Blocked => return Ok(()),
    }

    let chat_id = msg.chat.id;
    let mut game = state.game.lock(chat_id.0).await;

    let frequency = state
        .chat_settings
        .frequency(chat_id.0, state.config.spawn_frequency)
        .await?;

    if game.count_message(frequency) {
        debug!("Spawn due in chat {} (every {} messages)", chat_id, frequency);
        spawn_in_chat(&bot, &state, chat_id, &mut game).await?;
    }

    if state.config.star_chat_id == Some(chat_id.0) && game.count_star(state.config.star_frequency)
    {
        spawn_star(&bot, &state, chat_id, &mut game).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spam_notice_mentions_duration() {
        assert!(spam_notice().contains("12 minutes"));
    }
}
