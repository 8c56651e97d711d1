//! Card media URLs: classification, rewriting and validation.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client as HttpClient;
use thiserror::Error;
use tracing::debug;
use url::Url;

const VIDEO_EXTENSIONS: [&str; 6] = [".mp4", ".mov", ".avi", ".mkv", ".webm", ".flv"];
const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// How a card's media should be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Discord URL is missing the attachments path")]
    BadDiscordUrl,

    #[error("URL responded with status {0}")]
    Status(u16),

    #[error("URL does not point to an image or video")]
    NotMedia,

    #[error("could not reach URL: {0}")]
    Unreachable(#[from] reqwest::Error),
}

/// A video extension anywhere in the URL, so `clip.mp4/download`
/// and `clip.mp4?dl=1` both count.
pub fn is_video_url(url: &str) -> bool {
    let url = url.to_lowercase();
    VIDEO_EXTENSIONS.iter().any(|ext| url.contains(ext))
}

fn has_media_extension(url: &str) -> bool {
    let lower = url.to_lowercase();
    is_video_url(url) || IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

pub fn is_discord_cdn_url(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .is_some_and(|h| h == "cdn.discordapp.com" || h == "media.discordapp.net")
}

/// Rewrite common share links into direct media links.
pub fn process_image_url(url: &str) -> String {
    let url = url.trim();

    if let Some(rest) = url.strip_prefix("https://media.discordapp.net/") {
        return format!("https://cdn.discordapp.com/{rest}");
    }

    if url.starts_with("https://github.com/") && url.contains("/blob/") {
        return url
            .replacen("https://github.com/", "https://raw.githubusercontent.com/", 1)
            .replacen("/blob/", "/", 1);
    }

    if let Some(id) = url
        .strip_prefix("https://imgur.com/")
        .or_else(|| url.strip_prefix("http://imgur.com/"))
    {
        if !id.is_empty() && !id.contains('/') && !id.contains('.') {
            return format!("https://i.imgur.com/{id}.jpg");
        }
    }

    url.to_string()
}

/// HTTP client used for media checks.
pub fn media_client() -> HttpClient {
    HttpClient::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| HttpClient::new())
}

/// Check that a URL serves an image or a video.
///
/// Discord CDN links are only checked structurally.
pub async fn validate_media_url(client: &HttpClient, url: &str) -> Result<MediaKind, MediaError> {
    let parsed = Url::parse(url).map_err(|_| MediaError::InvalidUrl(url.to_string()))?;
    let guessed = if is_video_url(url) {
        MediaKind::Video
    } else {
        MediaKind::Photo
    };

    if is_discord_cdn_url(url) {
        if !parsed.path().starts_with("/attachments/") {
            return Err(MediaError::BadDiscordUrl);
        }
        return Ok(guessed);
    }

    let response = client.get(parsed).send().await?;
    if !response.status().is_success() {
        return Err(MediaError::Status(response.status().as_u16()));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_lowercase();
    debug!("Media check {} -> {}", url, content_type);

    if content_type.starts_with("video/") {
        Ok(MediaKind::Video)
    } else if content_type.starts_with("image/") {
        Ok(MediaKind::Photo)
    } else if has_media_extension(url) {
        Ok(guessed)
    } else {
        Err(MediaError::NotMedia)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_extensions() {
        assert!(is_video_url("https://x.io/clip.webm"));
        assert!(is_video_url("https://x.io/clip.MOV?ex=1"));
        assert!(!is_video_url("https://x.io/pic.png"));
        assert!(!is_video_url("https://x.io/mp4/pic.png"));
        assert!(is_video_url("https://host.io/files/clip.mp4/download"));
    }

    #[test]
    fn test_discord_detection() {
        assert!(is_discord_cdn_url("https://cdn.discordapp.com/attachments/1/2/a.png"));
        assert!(is_discord_cdn_url("https://media.discordapp.net/attachments/1/2/a.png"));
        assert!(!is_discord_cdn_url("https://discord.com/a.png"));
        assert!(!is_discord_cdn_url("not a url"));
    }

    #[test]
    fn test_process_image_url() {
        assert_eq!(
            process_image_url("https://media.discordapp.net/attachments/1/2/a.png?w=1"),
            "https://cdn.discordapp.com/attachments/1/2/a.png?w=1"
        );
        assert_eq!(
            process_image_url("https://github.com/u/r/blob/main/img/a.png"),
            "https://raw.githubusercontent.com/u/r/main/img/a.png"
        );
        assert_eq!(process_image_url("https://imgur.com/AbC123"), "https://i.imgur.com/AbC123.jpg");
        assert_eq!(
            process_image_url("https://imgur.com/gallery/AbC123"),
            "https://imgur.com/gallery/AbC123"
        );
        assert_eq!(process_image_url(" https://x.io/a.png "), "https://x.io/a.png");
    }

    #[tokio::test]
    async fn test_validate_rejects_without_network() {
        let client = media_client();
        assert!(matches!(
            validate_media_url(&client, "nope").await,
            Err(MediaError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_media_url(&client, "https://cdn.discordapp.com/emojis/1.png").await,
            Err(MediaError::BadDiscordUrl)
        ));
        assert_eq!(
            validate_media_url(&client, "https://cdn.discordapp.com/attachments/1/2/a.mp4")
                .await
                .ok(),
            Some(MediaKind::Video)
        );
    }
}
