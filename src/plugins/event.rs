//! Christmas event commands.

use teloxide::prelude::*;
use tracing::info;

use super::NOT_SUDO;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::EventSettings;
use crate::utils::{html_escape, reply_html, ReplyExt};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn already_active(event: &EventSettings) -> String {
    format!(
        "⚠️ <b>Event already active!</b>\n\n\
        🎄 Event Type: {}\n\
        📅 Started: {}\n\
        👤 Started by: {}\n\n\
        Use /endevent to end the current event first.",
        title_case(&event.event_type),
        event.started_at,
        html_escape(&event.started_by_name)
    )
}

fn status_text(event: &EventSettings, cards: u64) -> String {
    format!(
        "🎄✨ <b>CHRISTMAS EVENT ACTIVE!</b> ✨🎄\n\n\
        {RULE}\n\
        🎴 <b>Available Cards:</b> {cards}\n\
        🎯 <b>Filter:</b> Characters with {}\n\
        📅 <b>Started:</b> {}\n\
        👤 <b>Started by:</b> {}\n\
        {RULE}\n\n\
        ❄️ Only Christmas-themed cards are spawning!",
        event.filter_emoji,
        event.started_at,
        html_escape(&event.started_by_name)
    )
}

/// Handle /eventstatus.
pub async fn eventstatus_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let text = match state.events.active().await? {
        Some(event) => {
            let cards = state
                .characters
                .count_name_containing(&event.filter_emoji)
                .await?;
            status_text(&event, cards)
        }
        None => "📋 <b>No Active Event</b>\n\n\
            All characters are spawning normally.\n\
            Admins can use /startevent to start the Christmas event."
            .to_string(),
    };

    reply_html(&bot, &msg, text).await?;
    Ok(())
}

/// Handle /startevent.
pub async fn startevent_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;

    if !state.permissions.is_sudo(user_id) {
        reply_html(&bot, &msg, NOT_SUDO).await?;
        return Ok(());
    }

    let cards = state
        .characters
        .count_name_containing(EventSettings::CHRISTMAS_EMOJI)
        .await?;
    if cards == 0 {
        reply_html(
            &bot,
            &msg,
            "❌ <b>Cannot start Christmas event!</b>\n\n\
            No characters with 🎄 in their name found in the database.\n\n\
            Please upload some Christmas-themed characters first using:\n\
            <code>/upload [url] Character-Name-🎄 Anime-Name [rarity]</code>",
        )
        .await?;
        return Ok(());
    }

    if let Some(existing) = state.events.active().await? {
        reply_html(&bot, &msg, already_active(&existing)).await?;
        return Ok(());
    }

    let event = EventSettings::christmas(user_id, user.first_name.clone());
    if !state.events.start(&event).await? {
        // Lost a race with another /startevent.
        if let Some(existing) = state.events.active().await? {
            reply_html(&bot, &msg, already_active(&existing)).await?;
        }
        return Ok(());
    }

    info!("User {} started the Christmas event", user_id);

    let text = format!(
        "🎄✨ <b>CHRISTMAS EVENT STARTED!</b> ✨🎄\n\n\
        {RULE}\n\
        🎅 Ho ho ho! The Christmas event is now active!\n\n\
        🎴 <b>Available Christmas Cards:</b> {cards}\n\
        🎁 Only characters with 🎄 in their name will spawn!\n\
        {RULE}\n\n\
        👤 <b>Started by:</b> {}\n\n\
        ❄️ Use /endevent to end the Christmas event.",
        html_escape(&user.first_name)
    );
    reply_html(&bot, &msg, text).await?;
    Ok(())
}

/// Handle /endevent.
pub async fn endevent_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;

    if !state.permissions.is_sudo(user_id) {
        reply_html(&bot, &msg, NOT_SUDO).await?;
        return Ok(());
    }

    let Some(event) = state.events.end(user_id, &user.first_name).await? else {
        reply_html(
            &bot,
            &msg,
            "❌ <b>No active event!</b>\n\n\
            There is no event currently running.\n\
            Use /startevent to start the Christmas event.",
        )
        .await?;
        return Ok(());
    };

    info!("User {} ended the {} event", user_id, event.event_type);

    let ended_by = html_escape(&user.first_name);
    let text = if event.event_type == EventSettings::CHRISTMAS {
        format!(
            "🎄 <b>CHRISTMAS EVENT ENDED!</b> 🎄\n\n\
            {RULE}\n\
            👋 The Christmas event has ended!\n\n\
            🔄 Normal character spawning has resumed.\n\
            All characters can now spawn again!\n\
            {RULE}\n\n\
            👤 <b>Ended by:</b> {ended_by}\n\n\
            🎁 Thanks for participating in the event!"
        )
    } else {
        format!(
            "✅ <b>Event Ended!</b>\n\n\
            Event type: {}\n\
            Ended by: {ended_by}\n\n\
            Normal spawning has resumed.",
            title_case(&event.event_type)
        )
    };

    reply_html(&bot, &msg, text).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_conflict_texts() {
        let event = EventSettings::christmas(1, "Ann & Co");
        let status = status_text(&event, 12);
        assert!(status.contains("Available Cards:</b> 12"));
        assert!(status.contains("Characters with 🎄"));
        assert!(status.contains("Ann &amp; Co"));

        let conflict = already_active(&event);
        assert!(conflict.contains("Event Type: Christmas"));
    }
}
