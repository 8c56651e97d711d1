//! Posting character cards with media fallbacks.
//!
//! Cards are sent as video when the URL or name says so, then as photo,
//! then as plain text when Telegram refuses the media.

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, InputFile, MessageId, ParseMode, ReplyParameters};
use tracing::warn;
use url::Url;

use super::media::process_image_url;
use crate::bot::dispatcher::ThrottledBot;
use crate::database::Character;

/// Caption used when a video card has to be sent as a photo.
pub fn photo_fallback_caption(caption: &str) -> String {
    format!("🎬 {caption}")
}

/// Text used when no media could be sent at all.
pub fn text_fallback(caption: &str) -> String {
    format!("{caption}\n\n⚠️ Image could not be loaded")
}

/// Send a card's media with an HTML caption.
pub async fn send_card(
    bot: &ThrottledBot,
    chat_id: ChatId,
    character: &Character,
    caption: &str,
    reply_to: Option<MessageId>,
    keyboard: Option<InlineKeyboardMarkup>,
) -> anyhow::Result<Message> {
    let media_url = Url::parse(&process_image_url(&character.img_url));

    if let Ok(url) = media_url {
        let is_video = character.is_video();

        if is_video {
            let mut req = bot
                .send_video(chat_id, InputFile::url(url.clone()))
                .caption(caption)
                .parse_mode(ParseMode::Html);
            if let Some(id) = reply_to {
                req = req.reply_parameters(ReplyParameters::new(id));
            }
            if let Some(kb) = keyboard.clone() {
                req = req.reply_markup(kb);
            }
            match req.await {
                Ok(sent) => return Ok(sent),
                Err(e) => warn!("Video send failed for card {}, trying photo: {}", character.id, e),
            }
        }

        let photo_caption = if is_video {
            photo_fallback_caption(caption)
        } else {
            caption.to_string()
        };
        let mut req = bot
            .send_photo(chat_id, InputFile::url(url))
            .caption(photo_caption)
            .parse_mode(ParseMode::Html);
        if let Some(id) = reply_to {
            req = req.reply_parameters(ReplyParameters::new(id));
        }
        if let Some(kb) = keyboard.clone() {
            req = req.reply_markup(kb);
        }
        match req.await {
            Ok(sent) => return Ok(sent),
            Err(e) => warn!("Photo send failed for card {}: {}", character.id, e),
        }
    } else {
        warn!("Card {} has an unusable media URL", character.id);
    }

    let mut req = bot
        .send_message(chat_id, text_fallback(caption))
        .parse_mode(ParseMode::Html);
    if let Some(id) = reply_to {
        req = req.reply_parameters(ReplyParameters::new(id));
    }
    if let Some(kb) = keyboard {
        req = req.reply_markup(kb);
    }
    Ok(req.await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_texts() {
        assert_eq!(photo_fallback_caption("hi"), "🎬 hi");
        assert!(text_fallback("🟢 A beauty").ends_with("Image could not be loaded"));
        assert!(text_fallback("🟢 A beauty").starts_with("🟢 A beauty\n\n"));
    }
}
