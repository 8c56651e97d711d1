//! Claim leaderboards: /topgroups and /top.

use teloxide::prelude::*;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{GroupTotal, GroupUserTotal};
use crate::utils::{html_escape, reply_html};

const LEADERBOARD_SIZE: i64 = 10;

/// Names longer than this are cut with "...".
const MAX_NAME_CHARS: usize = 15;

fn short_name(name: &str) -> String {
    if name.chars().count() > MAX_NAME_CHARS {
        let cut: String = name.chars().take(MAX_NAME_CHARS).collect();
        format!("{}...", html_escape(&cut))
    } else {
        html_escape(name)
    }
}

fn groups_text(groups: &[GroupTotal]) -> String {
    let mut text = String::from("<b>🏆 TOP 10 GROUPS WHO GUESSED MOST CHARACTERS</b>\n\n");
    for (i, group) in groups.iter().enumerate() {
        let name = group.group_name.as_deref().unwrap_or("Unknown");
        text.push_str(&format!(
            "{}. <b>{}</b> ➾ <b>{}</b>\n",
            i + 1,
            short_name(name),
            group.count
        ));
    }
    text
}

fn users_text(users: &[GroupUserTotal]) -> String {
    let mut text = String::from("<b>🏆 TOP 10 USERS WHO GUESSED CHARACTERS MOST TIME IN THIS GROUP</b>\n\n");
    for (i, user) in users.iter().enumerate() {
        let link = match &user.username {
            Some(username) => format!("https://t.me/{username}"),
            None => format!("tg://user?id={}", user.user_id),
        };
        text.push_str(&format!(
            "{}. <a href=\"{}\"><b>{}</b></a> ➾ <b>{}</b>\n",
            i + 1,
            link,
            short_name(&user.first_name),
            user.count
        ));
    }
    text
}

/// Handle /topgroups.
pub async fn topgroups_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let groups = state.leaderboard.top_groups(LEADERBOARD_SIZE).await?;
    if groups.is_empty() {
        reply_html(&bot, &msg, "No group has guessed a character yet.").await?;
        return Ok(());
    }

    reply_html(&bot, &msg, groups_text(&groups)).await?;
    Ok(())
}

/// Handle /top inside a group.
pub async fn top_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    if !(msg.chat.is_group() || msg.chat.is_supergroup()) {
        reply_html(&bot, &msg, "This command only works in groups.").await?;
        return Ok(());
    }

    let users = state.leaderboard.top_in_group(msg.chat.id.0, LEADERBOARD_SIZE).await?;
    if users.is_empty() {
        reply_html(&bot, &msg, "Nobody has guessed a character in this group yet.").await?;
        return Ok(());
    }

    reply_html(&bot, &msg, users_text(&users)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("Rem"), "Rem");
        assert_eq!(short_name("A very long group name"), "A very long gro...");
        assert_eq!(short_name("<b>"), "&lt;b&gt;");
    }

    #[test]
    fn test_users_text_links() {
        let users = vec![
            GroupUserTotal {
                user_id: 1,
                group_id: -5,
                username: Some("rem".into()),
                first_name: "Rem".into(),
                count: 9,
            },
            GroupUserTotal {
                user_id: 2,
                group_id: -5,
                username: None,
                first_name: "Ram".into(),
                count: 3,
            },
        ];
        let text = users_text(&users);
        assert!(text.contains("1. <a href=\"https://t.me/rem\"><b>Rem</b></a> ➾ <b>9</b>"));
        assert!(text.contains("tg://user?id=2"));
    }

    #[test]
    fn test_groups_text_unknown_name() {
        let groups = vec![GroupTotal {
            group_id: -1,
            group_name: None,
            count: 4,
        }];
        assert!(groups_text(&groups).contains("1. <b>Unknown</b> ➾ <b>4</b>"));
    }
}
