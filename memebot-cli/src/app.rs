//! Bot assembly: tracing, catalog, handler chain, catalog reload and the REPL.

use anyhow::{Context, Result};
use handler_chain::HandlerChain;
use handlers::{ChatFilterHandler, LoggingHandler};
use meme_catalog::CatalogStore;
use meme_handlers::{build_meme_handler, url_avatar_source, MemeConfig};
use meme_render_client::CatalogFetcher;
use memebot_core::{init_tracing, AvatarSource, Bot};
use memebot_telegram::{
    build_teloxide_bot, run_repl, TelegramAvatarSource, TelegramBotAdapter, TelegramConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// `AVATAR_URL_TEMPLATE` when configured, otherwise the Telegram profile photo.
pub fn select_avatar_source(
    config: &MemeConfig,
    teloxide_bot: &teloxide::Bot,
) -> Result<Arc<dyn AvatarSource>> {
    if let Some(client) = url_avatar_source(config)? {
        info!("Avatars from AVATAR_URL_TEMPLATE");
        return Ok(Arc::new(client));
    }
    Ok(Arc::new(TelegramAvatarSource::new(
        teloxide_bot.clone(),
        Duration::from_secs(config.avatar_timeout_secs),
    )))
}

/// Logging first, then the chat filter, then the meme handler.
pub fn build_handler_chain(
    config: &MemeConfig,
    catalog: Arc<CatalogStore>,
    bot: Arc<dyn Bot>,
    avatars: Arc<dyn AvatarSource>,
) -> Result<HandlerChain> {
    let meme_handler = build_meme_handler(config, catalog, bot, avatars)?;
    Ok(HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(ChatFilterHandler::new(
            config.group_only,
            config.allowed_chat_ids.clone(),
        )))
        .add_handler(Arc::new(meme_handler)))
}

/// Reloads the catalog from disk on every SIGHUP. No-op on non-unix targets.
#[cfg(unix)]
pub fn spawn_reload_on_sighup(store: Arc<CatalogStore>) -> Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangups = signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?;
    tokio::spawn(async move {
        while hangups.recv().await.is_some() {
            info!(path = %store.path().display(), "SIGHUP received, reloading meme catalog");
            store.reload().await;
        }
    });
    Ok(())
}

#[cfg(not(unix))]
pub fn spawn_reload_on_sighup(_store: Arc<CatalogStore>) -> Result<()> {
    Ok(())
}

/// Runs the bot until the REPL exits.
pub async fn run_bot(telegram: TelegramConfig, meme: MemeConfig) -> Result<()> {
    init_tracing(telegram.log_file.as_deref())?;
    info!(
        api_url = %meme.api_url,
        catalog_path = %meme.catalog_path,
        group_only = meme.group_only,
        "Starting memebot"
    );

    let catalog = Arc::new(CatalogStore::load(&meme.catalog_path));
    let snapshot = catalog.snapshot().await;
    info!(
        templates = snapshot.len(),
        keywords = snapshot.keyword_count(),
        "Meme catalog ready"
    );

    let teloxide_bot = build_teloxide_bot(&telegram)?;
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let avatars = select_avatar_source(&meme, &teloxide_bot)?;
    let chain = build_handler_chain(&meme, catalog.clone(), bot, avatars)?;
    spawn_reload_on_sighup(catalog)?;

    run_repl(teloxide_bot, chain).await
}

/// Fetches every template's info from the render service and writes the catalog YAML.
pub async fn fetch_catalog(output: Option<String>, api_url: Option<String>) -> Result<()> {
    init_tracing(None)?;
    let meme = MemeConfig::from_env()?;
    let api_url = api_url.unwrap_or(meme.api_url);
    let output = output.unwrap_or(meme.catalog_path);

    let fetcher = CatalogFetcher::new(
        api_url.clone(),
        Duration::from_secs(meme.render_timeout_secs),
    )?;
    let entries = fetcher
        .fetch_all()
        .await
        .with_context(|| format!("Failed to fetch meme catalog from {}", api_url))?;
    CatalogFetcher::write_yaml(&entries, &output)
        .with_context(|| format!("Failed to write meme catalog to {}", output))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use meme_catalog::Catalog;
    use memebot_core::{Chat, Message};

    struct NullBot;

    #[async_trait]
    impl Bot for NullBot {
        async fn send_message(&self, _chat: &Chat, _text: &str) -> memebot_core::Result<()> {
            Ok(())
        }
        async fn reply_to(&self, _message: &Message, _text: &str) -> memebot_core::Result<()> {
            Ok(())
        }
        async fn send_image(&self, _chat: &Chat, _image: Bytes) -> memebot_core::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_build_handler_chain_has_three_handlers() {
        let config = MemeConfig::default();
        let catalog = Arc::new(CatalogStore::with_catalog("unused.yaml", Catalog::empty()));
        let bot = teloxide::Bot::new("123:abc");
        let avatars = select_avatar_source(&config, &bot).unwrap();
        let chain = build_handler_chain(&config, catalog, Arc::new(NullBot), avatars).unwrap();
        assert_eq!(chain.len(), 3);
    }

    #[tokio::test]
    async fn test_select_avatar_source_honours_url_template() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/avatar/qq/7")
            .with_status(200)
            .with_body("URL_AVATAR")
            .create_async()
            .await;

        let config = MemeConfig {
            avatar_url_template: Some(format!("{}/avatar/{{platform}}/{{user_id}}", server.url())),
            ..MemeConfig::default()
        };
        let avatars = select_avatar_source(&config, &teloxide::Bot::new("123:abc")).unwrap();

        assert_eq!(avatars.avatar(7).await.as_deref(), Some(&b"URL_AVATAR"[..]));
        mock.assert_async().await;
    }
}
