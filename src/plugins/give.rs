//! /give: hand a catalogue card to a user.

use teloxide::prelude::*;
use tracing::info;

use super::NOT_SUDO;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::utils::{get_target_from_msg, html_escape, mention_html, reply_html, ReplyExt};

const USAGE: &str = "📝 <b>Give Character</b>\n\n\
    Usage: <code>/give &lt;character_id&gt; &lt;user_id&gt;</code>\n\
    Example: <code>/give 1 123456789</code>\n\n\
    Or reply to a user: <code>/give &lt;character_id&gt;</code>";

/// Handle /give <character_id> [user_id|@username], or as a reply.
pub async fn give_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    if !state.permissions.is_sudo(user_id) {
        reply_html(&bot, &msg, NOT_SUDO).await?;
        return Ok(());
    }

    let Some(&character_id) = msg.args().first() else {
        reply_html(&bot, &msg, USAGE).await?;
        return Ok(());
    };

    let Some((target, _)) = get_target_from_msg(&msg, &state, 1).await else {
        reply_html(&bot, &msg, USAGE).await?;
        return Ok(());
    };

    let Some(character) = state.characters.get(character_id).await? else {
        reply_html(
            &bot,
            &msg,
            format!(
                "❌ Character with ID <code>{}</code> not found in the database.",
                html_escape(character_id)
            ),
        )
        .await?;
        return Ok(());
    };

    state
        .collectors
        .add_card(
            target.id,
            target.username.as_deref(),
            &target.first_name,
            &character,
            None,
        )
        .await?;

    info!("User {} gave {} to {}", user_id, character.id, target.id);

    let text = format!(
        "✅ <b>Character Given!</b>\n\n\
        🎴 <b>{}</b> ({})\n\
        📺 From: <b>{}</b>\n\
        👤 Given to: {}\n\
        🆔 Character ID: <code>{}</code>",
        html_escape(&character.name),
        character.rarity,
        html_escape(&character.anime),
        mention_html(target.id, &target.first_name),
        character.id
    );
    reply_html(&bot, &msg, text).await?;
    Ok(())
}
