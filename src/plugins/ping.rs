//! Ping command plugin.
//!
//! Measures and displays Telegram API latency.

use std::time::Instant;

use teloxide::prelude::*;
use teloxide::types::{ParseMode, ReplyParameters};

use crate::bot::dispatcher::{AppState, ThrottledBot};

fn latency_emoji(ms: u128) -> &'static str {
    if ms < 100 {
        "🟢"
    } else if ms < 300 {
        "🟡"
    } else {
        "🔴"
    }
}

/// Handle the /ping command - measures Telegram API latency.
pub async fn ping_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    // getMe is the cheapest round trip
    let start = Instant::now();
    let _ = bot.get_me().await;
    let ms = start.elapsed().as_millis();

    let text = format!(
        "{} Pong! <code>{}ms</code>\n🎴 Active chats: {}",
        latency_emoji(ms),
        ms,
        state.game.tracked_chats()
    );

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_emoji() {
        assert_eq!(latency_emoji(20), "🟢");
        assert_eq!(latency_emoji(150), "🟡");
        assert_eq!(latency_emoji(900), "🔴");
    }
}
