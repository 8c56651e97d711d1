//! /broadcast: copy a message to every known group and PM user.

use std::collections::BTreeSet;

use teloxide::prelude::*;
use tracing::{debug, info};

use super::NOT_OWNER;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::utils::{reply_html, ReplyExt};

/// Every chat id once, groups and users merged.
fn recipients(groups: Vec<i64>, users: Vec<i64>) -> BTreeSet<i64> {
    groups.into_iter().chain(users).collect()
}

/// Handle /broadcast as a reply. Owners only.
pub async fn broadcast_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    if !state.permissions.is_owner(user_id) {
        reply_html(&bot, &msg, NOT_OWNER).await?;
        return Ok(());
    }

    let Some(source) = msg.reply_to_message() else {
        reply_html(
            &bot,
            &msg,
            "Please reply to a message to broadcast.\n\n\
            Supported: Text, Images, GIFs, Videos, and more!",
        )
        .await?;
        return Ok(());
    };

    let chats = recipients(
        state.leaderboard.group_ids().await?,
        state.pm_users.user_ids().await?,
    );
    info!("User {} broadcasting to {} chats", user_id, chats.len());

    let (mut sent, mut failed) = (0usize, 0usize);
    for chat in chats {
        match bot.copy_message(ChatId(chat), source.chat.id, source.id).await {
            Ok(_) => sent += 1,
            Err(e) => {
                debug!("Broadcast to {} failed: {}", chat, e);
                failed += 1;
            }
        }
    }

    info!("Broadcast done: {} sent, {} failed", sent, failed);
    reply_html(
        &bot,
        &msg,
        format!("✅ Broadcast complete!\n\n📤 Sent to: {sent} chats/users\n❌ Failed: {failed}"),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipients_are_deduplicated() {
        let all = recipients(vec![-100, 5, -200], vec![5, 7]);
        assert_eq!(all.into_iter().collect::<Vec<_>>(), vec![-200, -100, 5, 7]);
    }
}
