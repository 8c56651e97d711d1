//! /bonk and /unbonk: bar users from claiming for a while.

use chrono::{DateTime, Utc};
use teloxide::prelude::*;
use tracing::info;

use super::NOT_SUDO;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::BannedUser;
use crate::utils::parser::format_remaining;
use crate::utils::{get_target_from_msg, html_escape, mention_html, parse_duration, reply_html, ReplyExt};

const BONK_USAGE: &str = "Usage: <code>/bonk &lt;user&gt; &lt;duration&gt; [reason]</code>\n\
    Durations: 30m, 12h, 3d, 1w. Reply to a user to skip the user argument.";

/// End of a ban starting at `now`, or None when out of range.
fn ban_end(now: DateTime<Utc>, duration: std::time::Duration) -> Option<DateTime<Utc>> {
    let delta = chrono::Duration::from_std(duration).ok()?;
    now.checked_add_signed(delta)
}

/// Handle /bonk <user> <duration> [reason].
pub async fn bonk_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    if !state.permissions.is_sudo(user_id) {
        reply_html(&bot, &msg, NOT_SUDO).await?;
        return Ok(());
    }

    let Some((target, consumed)) = get_target_from_msg(&msg, &state, 0).await else {
        reply_html(&bot, &msg, BONK_USAGE).await?;
        return Ok(());
    };

    if state.permissions.is_sudo(target.id) {
        reply_html(&bot, &msg, "🚫 You can't bonk an administrator.").await?;
        return Ok(());
    }

    let args = msg.args();
    let Some(duration) = args.get(consumed).and_then(|d| parse_duration(d)) else {
        reply_html(&bot, &msg, BONK_USAGE).await?;
        return Ok(());
    };

    let reason = args
        .get(consumed + 1..)
        .map(|rest| rest.join(" "))
        .filter(|r| !r.is_empty());

    let Some(until) = ban_end(Utc::now(), duration) else {
        reply_html(&bot, &msg, BONK_USAGE).await?;
        return Ok(());
    };
    state
        .bans
        .ban(&BannedUser::until(target.id, until, reason.clone()))
        .await?;
    info!("User {} bonked {} for {:?}", user_id, target.id, duration);

    let mut text = format!(
        "🔨 {} has been bonked for <b>{}</b> and can't marry characters.",
        mention_html(target.id, &target.first_name),
        format_remaining(duration.as_secs())
    );
    if let Some(reason) = reason {
        text.push_str(&format!("\n📝 Reason: {}", html_escape(&reason)));
    }
    reply_html(&bot, &msg, text).await?;
    Ok(())
}

/// Handle /unbonk <user>.
pub async fn unbonk_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    if !state.permissions.is_sudo(user_id) {
        reply_html(&bot, &msg, NOT_SUDO).await?;
        return Ok(());
    }

    let Some((target, _)) = get_target_from_msg(&msg, &state, 0).await else {
        reply_html(&bot, &msg, "Usage: <code>/unbonk &lt;user&gt;</code> or reply to a user").await?;
        return Ok(());
    };

    let mention = mention_html(target.id, &target.first_name);
    let text = if state.bans.unban(target.id).await? {
        info!("User {} unbonked {}", user_id, target.id);
        format!("✅ {mention} has been unbonked.")
    } else {
        format!("{mention} is not bonked.")
    };
    reply_html(&bot, &msg, text).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ban_end() {
        let now = Utc::now();
        let day = std::time::Duration::from_secs(86400);
        assert_eq!(ban_end(now, day), Some(now + chrono::Duration::days(1)));

        let huge = parse_duration("1000000000w").unwrap();
        assert!(ban_end(now, huge).is_none());
    }
}
