//! Webhook mode implementation for the bot.
//!
//! Uses teloxide's axum webhook router, merged with the health routes
//! hosting platforms poll:
//! - `POST /webhook` receives updates
//! - `GET /` and `GET /health` answer "Bot is running!"

use std::net::SocketAddr;

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks::{self, Options};
use tracing::{error, info};
use url::Url;

use super::dispatcher::ThrottledBot;
use crate::config::Config;

const WEBHOOK_PATH: &str = "webhook";

async fn health() -> &'static str {
    "Bot is running!"
}

/// Public URL Telegram should post updates to.
pub fn webhook_url(base: &str) -> anyhow::Result<Url> {
    let mut base = Url::parse(base).context("Invalid WEBHOOK_URL format")?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(WEBHOOK_PATH)?)
}

/// Start the bot in webhook mode.
///
/// On shutdown (Ctrl+C), the webhook is automatically deleted.
pub async fn start_webhook(
    config: &Config,
    mut dispatcher: Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey>,
    bot: ThrottledBot,
) -> anyhow::Result<()> {
    let base = config
        .webhook_url
        .as_deref()
        .context("WEBHOOK_URL must be set when using webhook mode")?;
    let url = webhook_url(base)?;

    // Server address - listen on all interfaces at the configured port
    let address = SocketAddr::from(([0, 0, 0, 0], config.webhook_port));

    let mut options = Options::new(address, url.clone());
    if let Some(ref secret) = config.webhook_secret {
        options = options.secret_token(secret.clone());
        info!("Webhook secret token configured");
    }

    info!("🔗 Setting webhook URL: {}", url);
    info!("📡 Listening on: {}", address);

    let (listener, stop_flag, webhook_router) =
        webhooks::axum_to_router(bot.inner().clone(), options).await?;

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .merge(webhook_router);

    let tcp = tokio::net::TcpListener::bind(address).await?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(tcp, app).with_graceful_shutdown(stop_flag).await {
            error!("Webhook server error: {}", e);
        }
    });

    info!("✅ Webhook setup complete, waiting for updates...");

    let error_handler = LoggingErrorHandler::with_custom_text("Error from update listener");
    dispatcher
        .dispatch_with_listener(listener, error_handler)
        .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_url() {
        assert_eq!(
            webhook_url("https://bot.example.com").unwrap().as_str(),
            "https://bot.example.com/webhook"
        );
        assert_eq!(
            webhook_url("https://bot.example.com/tg/").unwrap().as_str(),
            "https://bot.example.com/tg/webhook"
        );
        assert!(webhook_url("not a url").is_err());
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(health().await, "Bot is running!");
    }
}
