//! /changetime: per-chat spawn frequency.

use teloxide::prelude::*;
use tracing::info;

use super::NOT_SUDO;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::ChatSettings;
use crate::utils::{reply_html, ReplyExt};

#[derive(Debug, PartialEq, Eq)]
enum FrequencyArg {
    Valid(u32),
    TooLow,
    Invalid,
}

fn parse_frequency(args: &[&str]) -> FrequencyArg {
    let [value] = args else {
        return FrequencyArg::Invalid;
    };
    match value.parse::<i64>() {
        Ok(n) if n < 1 => FrequencyArg::TooLow,
        Ok(n) => u32::try_from(n).map_or(FrequencyArg::Invalid, FrequencyArg::Valid),
        Err(_) => FrequencyArg::Invalid,
    }
}

/// Handle /changetime N.
pub async fn changetime_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    if !state.permissions.is_sudo(user_id) {
        reply_html(&bot, &msg, NOT_SUDO).await?;
        return Ok(());
    }

    let frequency = match parse_frequency(&msg.args()) {
        FrequencyArg::Valid(n) => n,
        FrequencyArg::TooLow => {
            reply_html(&bot, &msg, "The message frequency must be at least 1.").await?;
            return Ok(());
        }
        FrequencyArg::Invalid => {
            reply_html(&bot, &msg, "Please use: /changetime NUMBER").await?;
            return Ok(());
        }
    };

    state
        .chat_settings
        .save(&ChatSettings::new(msg.chat.id.0, frequency))
        .await?;
    info!("Chat {} spawn frequency set to {} by {}", msg.chat.id, frequency, user_id);

    reply_html(&bot, &msg, format!("Successfully changed to {frequency} messages")).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frequency() {
        assert_eq!(parse_frequency(&["50"]), FrequencyArg::Valid(50));
        assert_eq!(parse_frequency(&["1"]), FrequencyArg::Valid(1));
        assert_eq!(parse_frequency(&["0"]), FrequencyArg::TooLow);
        assert_eq!(parse_frequency(&["-3"]), FrequencyArg::TooLow);
        assert_eq!(parse_frequency(&["ten"]), FrequencyArg::Invalid);
        assert_eq!(parse_frequency(&[]), FrequencyArg::Invalid);
        assert_eq!(parse_frequency(&["5", "6"]), FrequencyArg::Invalid);
    }
}
