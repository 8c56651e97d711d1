//! Uploader management: /adduploader, /removeuploader and /promote.

use teloxide::prelude::*;
use tracing::info;

use super::{NOT_OWNER, NOT_SUDO};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::Uploader;
use crate::permissions::MAX_UPLOADER_LEVEL;
use crate::utils::{get_target_from_msg, mention_html, parse_id, reply_html, ReplyExt};

/// Parse `/promote <user_id> <level>` arguments.
fn parse_promote(args: &[&str]) -> Result<(i64, u8), &'static str> {
    const USAGE: &str = "Usage: /promote &lt;user_id&gt; &lt;level&gt;";

    let [user, level] = args else {
        return Err(USAGE);
    };
    let user = parse_id(user).ok_or(USAGE)?;
    match level.parse::<u8>() {
        Ok(level) if (1..=MAX_UPLOADER_LEVEL).contains(&level) => Ok((user, level)),
        _ => Err("Level must be 1, 2, or 3."),
    }
}

/// Handle /adduploader <user_id|@username>, or as a reply.
pub async fn adduploader_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    if !state.permissions.is_owner(user_id) {
        reply_html(&bot, &msg, NOT_OWNER).await?;
        return Ok(());
    }

    let Some((target, _)) = get_target_from_msg(&msg, &state, 0).await else {
        reply_html(&bot, &msg, "Usage: /adduploader &lt;user_id&gt; or reply to a user").await?;
        return Ok(());
    };

    if let Some(existing) = state.uploaders.get(target.id).await? {
        reply_html(
            &bot,
            &msg,
            format!(
                "⚠️ {} is already an uploader (level {}).",
                mention_html(target.id, &target.first_name),
                existing.level
            ),
        )
        .await?;
        return Ok(());
    }

    state.uploaders.save(&Uploader::new(target.id, 1, user_id)).await?;
    state.permissions.invalidate_level(target.id);
    info!("User {} added uploader {}", user_id, target.id);

    reply_html(
        &bot,
        &msg,
        format!(
            "✅ {} can now upload characters (level 1).",
            mention_html(target.id, &target.first_name)
        ),
    )
    .await?;
    Ok(())
}

/// Handle /removeuploader <user_id|@username>, or as a reply.
pub async fn removeuploader_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    if !state.permissions.is_owner(user_id) {
        reply_html(&bot, &msg, NOT_OWNER).await?;
        return Ok(());
    }

    let Some((target, _)) = get_target_from_msg(&msg, &state, 0).await else {
        reply_html(&bot, &msg, "Usage: /removeuploader &lt;user_id&gt; or reply to a user").await?;
        return Ok(());
    };

    let removed = state.uploaders.remove(target.id).await?;
    state.permissions.invalidate_level(target.id);

    let mention = mention_html(target.id, &target.first_name);
    let text = if removed {
        info!("User {} removed uploader {}", user_id, target.id);
        format!("✅ {mention} is no longer an uploader.")
    } else {
        format!("❌ {mention} is not an added uploader.")
    };
    reply_html(&bot, &msg, text).await?;
    Ok(())
}

/// Handle /promote <user_id> <level>.
pub async fn promote_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    if !state.permissions.is_sudo(user_id) {
        reply_html(&bot, &msg, NOT_SUDO).await?;
        return Ok(());
    }

    let (target, level) = match parse_promote(&msg.args()) {
        Ok(parsed) => parsed,
        Err(text) => {
            reply_html(&bot, &msg, text).await?;
            return Ok(());
        }
    };

    let uploader = match state.uploaders.get(target).await? {
        Some(existing) => Uploader { level, ..existing },
        None => Uploader::new(target, level, user_id),
    };
    state.uploaders.save(&uploader).await?;
    state.permissions.invalidate_level(target);
    info!("User {} promoted {} to uploader level {}", user_id, target, level);

    reply_html(&bot, &msg, format!("✅ User {target} promoted to level {level}.")).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_promote() {
        assert_eq!(parse_promote(&["42", "2"]), Ok((42, 2)));
        assert_eq!(parse_promote(&["42", "4"]), Err("Level must be 1, 2, or 3."));
        assert_eq!(parse_promote(&["42", "0"]), Err("Level must be 1, 2, or 3."));
        assert!(parse_promote(&["42"]).is_err());
        assert!(parse_promote(&["bob", "1"]).is_err());
    }
}
