//! /summon: manual spawn in the current chat.

use teloxide::prelude::*;

use super::NOT_SUDO;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::Rarity;
use crate::events::spawner::{choose_spawn, spawn_caption};
use crate::utils::card::send_card;
use crate::utils::{reply_html, ReplyExt};

/// Handle /summon. A summoned card stays claimable until the next spawn.
pub async fn summon_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    if !state.permissions.is_sudo(user_id) {
        reply_html(&bot, &msg, NOT_SUDO).await?;
        return Ok(());
    }

    let chat_id = msg.chat.id;
    let mut game = state.game.lock(chat_id.0).await;

    let Some(character) =
        choose_spawn(&state, chat_id, &mut game, Rarity::summon_weight, true).await?
    else {
        reply_html(
            &bot,
            &msg,
            "📭 No characters in database to summon!\n\nUpload some characters first using /upload",
        )
        .await?;
        return Ok(());
    };

    send_card(&bot, chat_id, &character, &spawn_caption(character.rarity), None, None).await?;
    Ok(())
}
