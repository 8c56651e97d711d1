//! Utility functions.
//!
//! Collection of helper functions used across the bot.

pub mod card;
pub mod media;
pub mod parser;
pub mod reply;
pub mod target;

pub use parser::{html_escape, normalize_title, paginate, parse_duration, parse_id};
pub use reply::{reply_html, ReplyExt};
pub use target::{get_target_from_msg, Target};

/// HTML mention of a user by id.
pub fn mention_html(user_id: i64, name: &str) -> String {
    format!("<a href=\"tg://user?id={}\">{}</a>", user_id, html_escape(name))
}

/// Format a username for display.
///
/// If the user has a username, returns @username.
/// Otherwise, returns the first name.
pub fn format_username(username: Option<&str>, first_name: &str) -> String {
    match username {
        Some(u) => format!("@{}", u),
        None => first_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention_escapes_name() {
        assert_eq!(mention_html(5, "a<b"), "<a href=\"tg://user?id=5\">a&lt;b</a>");
        assert_eq!(format_username(Some("rem"), "Rem"), "@rem");
        assert_eq!(format_username(None, "Rem"), "Rem");
    }
}
