//! Target resolution utilities for user commands.
//!
//! Resolves the user a command acts on via reply, user ID or @username.

use teloxide::types::Message;

use super::reply::ReplyExt;
use crate::bot::dispatcher::AppState;

/// A user a command acts on.
#[derive(Debug, Clone)]
pub struct Target {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

/// Get target user from a message.
/// Returns the target and the number of arguments it consumed.
///
/// Resolution order:
/// 1. Reply message → use `reply.from`
/// 2. Numeric argument at `arg_index`, named from the user's collection
/// 3. @username → lookup in stored collections
pub async fn get_target_from_msg(
    msg: &Message,
    state: &AppState,
    arg_index: usize,
) -> Option<(Target, usize)> {
    if let Some(user) = msg.replied_user() {
        if !user.is_bot {
            return Some((
                Target {
                    id: user.id.0 as i64,
                    first_name: user.first_name.clone(),
                    username: user.username.clone(),
                },
                0,
            ));
        }
    }

    let args = msg.args();
    let arg = *args.get(arg_index)?;

    if let Ok(id) = arg.parse::<i64>() {
        let stored = state.collectors.get(id).await.ok().flatten();
        let target = match stored {
            Some(c) => Target {
                id,
                first_name: c.first_name,
                username: c.username,
            },
            None => Target {
                id,
                first_name: format!("User {}", id),
                username: None,
            },
        };
        return Some((target, 1));
    }

    if let Some(username) = arg.strip_prefix('@') {
        if let Ok(Some(c)) = state.collectors.find_by_username(username).await {
            return Some((
                Target {
                    id: c.id,
                    first_name: c.first_name,
                    username: c.username,
                },
                1,
            ));
        }
    }

    None
}
