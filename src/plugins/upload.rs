//! Catalogue management: /upload, /update, /delete, /remove and
//! /migrate_rarities.

use teloxide::prelude::*;
use teloxide::types::MessageId;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::NOT_SUDO;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{Character, Rarity};
use crate::utils::card::send_card;
use crate::utils::media::{is_discord_cdn_url, is_video_url, validate_media_url, MediaKind};
use crate::utils::{html_escape, mention_html, normalize_title, parse_id, reply_html, ReplyExt};

const NOT_UPLOADER: &str = "Ask My Owner or authorized uploader...";

const UPDATE_USAGE: &str = "Usage: /update ID img_url character-name anime-name rarity-number\n\n\
    Example: /update 1 https://example.com/img.jpg Muzan-Kibutsuji Demon-Slayer 5";

/// Why card arguments were rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("wrong argument count")]
    Format,

    #[error("unknown rarity number")]
    UnknownRarity,

    #[error("❌ Level {level} uploaders can only upload up to {max} rank (1-{number}).")]
    AboveLevel { level: u8, max: Rarity, number: u8 },
}

/// Card fields parsed from `img_url name anime rarity#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardArgs {
    pub img_url: String,
    pub name: String,
    pub anime: String,
    pub rarity: Rarity,
}

/// Parse card arguments for an uploader of `level`.
pub fn parse_card_args(args: &[&str], level: u8) -> Result<CardArgs, UploadError> {
    let [img_url, name, anime, rarity] = args else {
        return Err(UploadError::Format);
    };

    let number: u8 = rarity.parse().map_err(|_| UploadError::UnknownRarity)?;
    let rarity = Rarity::from_number(number).ok_or(UploadError::UnknownRarity)?;

    let max = Rarity::max_number_for_level(level);
    if number > max {
        return Err(UploadError::AboveLevel {
            level,
            max: Rarity::from_number(max).unwrap_or(Rarity::Common),
            number: max,
        });
    }

    Ok(CardArgs {
        img_url: img_url.to_string(),
        name: normalize_title(name),
        anime: normalize_title(anime),
        rarity,
    })
}

fn level_badge(level: u8) -> &'static str {
    match level {
        1 => "🪄",
        2 => "🎏",
        _ => "🎐",
    }
}

/// Usage text listing the rarities `level` may upload.
pub fn format_text(level: u8) -> String {
    let max = Rarity::max_number_for_level(level);
    let mut text = String::from(
        "Wrong ❌️ format...  eg. /upload Img_url muzan-kibutsuji Demon-slayer 5\n\n\
        img_url character-name anime-name rarity-number\n\n\
        You can upload these rarities:\n\n",
    );

    for rarity in Rarity::ALL.iter().filter(|r| r.number() <= max) {
        text.push_str(&format!("{} = {} {}\n", rarity.number(), rarity.emoji(), rarity));
    }

    text.push_str(&format!(
        "\nYour uploader level is {} {} !\n\n\
        ✅ Supported: Discord CDN links, direct image/video URLs (including MP4), \
        and other standard hosting services",
        level,
        level_badge(level)
    ));
    text
}

fn channel_caption(character: &Character, user_id: i64, first_name: &str, updated: bool) -> String {
    format!(
        "✨ <b>{}</b>{} ✨\n\
        🎌 <i>{}</i>\n\
        ━━━━━━━━━━━━━━━━\n\
        {} <b>{}</b>\n\
        🆔 <b>ID:</b> #{}\n\
        ━━━━━━━━━━━━━━━━\n\
        📤 {} by {}",
        html_escape(&character.name),
        if updated { " (UPDATED)" } else { "" },
        html_escape(&character.anime),
        character.rarity.emoji(),
        character.rarity,
        character.id,
        if updated { "Updated" } else { "Added" },
        mention_html(user_id, first_name)
    )
}

/// Mark videos the URL alone does not reveal, so later sends use video.
fn mark_video(name: String, kind: MediaKind, img_url: &str) -> String {
    if kind == MediaKind::Video && !is_video_url(img_url) && !name.contains('🎬') {
        format!("{name} 🎬")
    } else {
        name
    }
}

/// Post a card to the catalogue channel, if one is configured.
async fn post_to_channel(
    bot: &ThrottledBot,
    state: &AppState,
    character: &Character,
    caption: &str,
) -> anyhow::Result<MessageId> {
    let channel = state
        .config
        .chara_channel_id
        .ok_or_else(|| anyhow::anyhow!("CHARA_CHANNEL_ID is not set"))?;
    let message = send_card(bot, ChatId(channel), character, caption, None, None).await?;
    Ok(message.id)
}

async fn delete_channel_post(bot: &ThrottledBot, state: &AppState, message_id: Option<i32>) {
    let (Some(channel), Some(message_id)) = (state.config.chara_channel_id, message_id) else {
        return;
    };
    if let Err(e) = bot.delete_message(ChatId(channel), MessageId(message_id)).await {
        debug!("Could not delete channel post {}: {}", message_id, e);
    }
}

/// Handle /upload img_url name anime rarity#.
pub async fn upload_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;

    let level = state.permissions.uploader_level(user_id).await?;
    if level == 0 {
        reply_html(&bot, &msg, NOT_UPLOADER).await?;
        return Ok(());
    }

    let args = match parse_card_args(&msg.args(), level) {
        Ok(args) => args,
        Err(e @ UploadError::AboveLevel { .. }) => {
            reply_html(&bot, &msg, e.to_string()).await?;
            return Ok(());
        }
        Err(_) => {
            reply_html(&bot, &msg, format_text(level)).await?;
            return Ok(());
        }
    };

    let kind = match validate_media_url(&state.http, &args.img_url).await {
        Ok(kind) => kind,
        Err(e) => {
            reply_html(&bot, &msg, format!("Invalid URL: {}", html_escape(&e.to_string()))).await?;
            return Ok(());
        }
    };

    if is_discord_cdn_url(&args.img_url) {
        reply_html(&bot, &msg, "✅ Discord CDN link detected - processing...").await?;
    }

    let id = state.characters.next_id().await?;
    let name = mark_video(args.name, kind, &args.img_url);
    let character = Character::new(id, name, args.anime, args.rarity, args.img_url);

    state.characters.insert(&character).await?;
    info!("User {} uploaded {} ({})", user_id, character.id, character.rarity);

    let caption = channel_caption(&character, user_id, &user.first_name, false);
    match post_to_channel(&bot, &state, &character, &caption).await {
        Ok(message_id) => {
            state.characters.set_message_id(&character.id, message_id.0).await?;
            reply_html(&bot, &msg, "CHARACTER ADDED....").await?;
        }
        Err(e) => {
            warn!("Channel post for {} failed: {}", character.id, e);
            reply_html(
                &bot,
                &msg,
                "Character Added but no Database Channel Found, Consider adding one.",
            )
            .await?;
        }
    }

    Ok(())
}

/// Handle /update (or /edit) id img_url name anime rarity#.
pub async fn update_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;

    let level = state.permissions.uploader_level(user_id).await?;
    if level == 0 {
        reply_html(&bot, &msg, NOT_UPLOADER).await?;
        return Ok(());
    }

    let all_args = msg.args();
    let Some((&id, rest)) = all_args.split_first() else {
        reply_html(&bot, &msg, UPDATE_USAGE).await?;
        return Ok(());
    };

    let args = match parse_card_args(rest, level) {
        Ok(args) => args,
        Err(e @ UploadError::AboveLevel { .. }) => {
            reply_html(&bot, &msg, e.to_string()).await?;
            return Ok(());
        }
        Err(UploadError::UnknownRarity) => {
            reply_html(&bot, &msg, "Invalid rarity (1-11).").await?;
            return Ok(());
        }
        Err(UploadError::Format) => {
            reply_html(&bot, &msg, UPDATE_USAGE).await?;
            return Ok(());
        }
    };

    let Some(existing) = state.characters.get(id).await? else {
        reply_html(&bot, &msg, format!("❌ Character with ID #{} not found!", html_escape(id))).await?;
        return Ok(());
    };

    let kind = match validate_media_url(&state.http, &args.img_url).await {
        Ok(kind) => kind,
        Err(e) => {
            reply_html(&bot, &msg, format!("Invalid URL: {}", html_escape(&e.to_string()))).await?;
            return Ok(());
        }
    };

    let mut character = existing.clone();
    character.name = mark_video(args.name, kind, &args.img_url);
    character.anime = args.anime;
    character.rarity = args.rarity;
    character.img_url = args.img_url;

    let caption = channel_caption(&character, user_id, &user.first_name, true);
    let posted = post_to_channel(&bot, &state, &character, &caption).await;
    if let Ok(message_id) = &posted {
        character.message_id = Some(message_id.0);
        delete_channel_post(&bot, &state, existing.message_id).await;
    }

    state.characters.update(&character).await?;
    let refreshed = state.collectors.refresh_card(&character).await?;
    info!("User {} updated {} ({} collections)", user_id, character.id, refreshed);

    let text = match posted {
        Ok(_) => format!("✅ Character #{} updated successfully!", character.id),
        Err(e) => format!(
            "Character updated in DB but failed to update in channel: {}",
            html_escape(&e.to_string())
        ),
    };
    reply_html(&bot, &msg, text).await?;
    Ok(())
}

/// Handle /delete id.
pub async fn delete_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    if !state.permissions.is_sudo(user_id) {
        reply_html(&bot, &msg, NOT_SUDO).await?;
        return Ok(());
    }

    let args = msg.args();
    let [id] = args.as_slice() else {
        reply_html(&bot, &msg, "Incorrect format... Please use: /delete ID").await?;
        return Ok(());
    };

    let Some(character) = state.characters.delete(id).await? else {
        reply_html(&bot, &msg, format!("❌ Character with ID #{} not found!", html_escape(id))).await?;
        return Ok(());
    };

    let pulled = state.collectors.pull_everywhere(&character.id).await?;
    delete_channel_post(&bot, &state, character.message_id).await;
    info!("User {} deleted {} ({} collections)", user_id, character.id, pulled);

    reply_html(
        &bot,
        &msg,
        format!("✅ Character deleted from database and removed from {pulled} user collections."),
    )
    .await?;
    Ok(())
}

/// Handle /remove character_id user_id: take one copy from a user.
pub async fn remove_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    if !state.permissions.is_sudo(user_id) {
        reply_html(&bot, &msg, NOT_SUDO).await?;
        return Ok(());
    }

    let args = msg.args();
    let [character_id, target] = args.as_slice() else {
        reply_html(
            &bot,
            &msg,
            "❌ Incorrect format!\n\nUsage: /remove &lt;character_id&gt; &lt;user_id&gt;\n\
            Example: /remove 123 987654321",
        )
        .await?;
        return Ok(());
    };

    let Some(target_id) = parse_id(target) else {
        reply_html(&bot, &msg, "❌ Invalid user ID format!").await?;
        return Ok(());
    };

    let Some(character) = state.characters.get(character_id).await? else {
        reply_html(
            &bot,
            &msg,
            format!("❌ Character with ID #{} not found in database!", html_escape(character_id)),
        )
        .await?;
        return Ok(());
    };

    let Some(collector) = state.collectors.get(target_id).await? else {
        reply_html(&bot, &msg, format!("❌ User with ID {target_id} not found!")).await?;
        return Ok(());
    };

    let copies = collector.copies_of(&character.id);
    if copies == 0 || !state.collectors.remove_one(target_id, &character.id).await? {
        reply_html(
            &bot,
            &msg,
            format!(
                "❌ User does not have character #{} ({}) in their harem!",
                character.id,
                html_escape(&character.name)
            ),
        )
        .await?;
        return Ok(());
    }

    info!("User {} removed {} from {}", user_id, character.id, target_id);

    let text = format!(
        "✅ <b>Character Removed!</b>\n\n\
        🗑️ Removed: <b>{}</b> (#{})\n\
        👤 From: {}\n\
        📊 Remaining: {} copies",
        html_escape(&character.name),
        character.id,
        mention_html(target_id, &collector.first_name),
        copies - 1
    );
    reply_html(&bot, &msg, text).await?;
    Ok(())
}

/// Handle /migrate_rarities: rewrite pre-rename rarity names.
pub async fn migrate_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user_id) = msg.sender_id() else {
        return Ok(());
    };

    if !state.permissions.is_sudo(user_id) {
        reply_html(&bot, &msg, NOT_SUDO).await?;
        return Ok(());
    }

    let mut text = String::from("🔄 <b>Rarity Migration Complete!</b>\n");
    for (legacy, rarity) in [("Celestial", Rarity::Retro), ("Arcane", Rarity::Zenith)] {
        let characters = state.characters.rename_rarity(legacy, rarity).await?;
        let collections = state.collectors.rename_rarity(legacy, rarity).await?;
        info!(
            "Migrated {} -> {}: {} characters, {} collections",
            legacy, rarity, characters, collections
        );
        text.push_str(&format!(
            "\n{} {} → {}: {} characters, {} collections",
            rarity.emoji(),
            legacy,
            rarity,
            characters,
            collections
        ));
    }

    reply_html(&bot, &msg, text).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_card_args() {
        let args = parse_card_args(
            &["https://x.io/a.jpg", "muzan-kibutsuji", "demon_slayer", "5"],
            1,
        )
        .unwrap();
        assert_eq!(args.name, "Muzan Kibutsuji");
        assert_eq!(args.anime, "Demon Slayer");
        assert_eq!(args.rarity, Rarity::Legendary);
    }

    #[test]
    fn test_parse_card_args_errors() {
        assert_eq!(parse_card_args(&["u", "n", "a"], 3), Err(UploadError::Format));
        assert_eq!(parse_card_args(&["u", "n", "a", "x"], 3), Err(UploadError::UnknownRarity));
        assert_eq!(parse_card_args(&["u", "n", "a", "12"], 3), Err(UploadError::UnknownRarity));
        assert_eq!(
            parse_card_args(&["u", "n", "a", "7"], 1),
            Err(UploadError::AboveLevel {
                level: 1,
                max: Rarity::Mythic,
                number: 6
            })
        );
        assert!(parse_card_args(&["u", "n", "a", "9"], 2).is_ok());
        assert!(parse_card_args(&["u", "n", "a", "11"], 3).is_ok());
    }

    #[test]
    fn test_level_error_message() {
        let err = parse_card_args(&["u", "n", "a", "10"], 2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "❌ Level 2 uploaders can only upload up to Zenith rank (1-9)."
        );
    }

    #[test]
    fn test_format_text_lists_allowed_rarities() {
        let text = format_text(1);
        assert!(text.contains("6 = 🏵 Mythic"));
        assert!(!text.contains("7 = 🍥 Retro"));
        assert!(format_text(3).contains("11 = 👾 Custom"));
    }

    #[test]
    fn test_mark_video() {
        assert_eq!(mark_video("Rem".into(), MediaKind::Video, "https://x.io/v"), "Rem 🎬");
        assert_eq!(mark_video("Rem".into(), MediaKind::Video, "https://x.io/v.mp4"), "Rem");
        assert_eq!(mark_video("Rem".into(), MediaKind::Photo, "https://x.io/v"), "Rem");
    }

    #[test]
    fn test_channel_caption() {
        let c = Character::new("8", "Rem", "Re Zero", Rarity::Rare, "u");
        assert!(channel_caption(&c, 1, "Ann", true).contains("(UPDATED)"));
        assert!(channel_caption(&c, 1, "Ann", false).contains("Added by"));
    }
}
