//! 表情包 Handler：把一条消息解析成表情包请求，调用渲染服务并回复图片或提示。

use crate::avatar_policy::{resolve_images, AvatarBundle, AvatarNeeds};
use crate::config::MemeConfig;
use crate::extractor::{extract, ExtractError};
use anyhow::Result as AnyResult;
use async_trait::async_trait;
use bytes::Bytes;
use meme_catalog::CatalogStore;
use meme_render_client::{AvatarClient, MemeRequest, RenderClient};
use memebot_core::{AvatarSource, Bot, Handler, HandlerResponse, Message, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

// --- 用户可见的提示 ---
pub const USAGE_HINT: &str = "请输入表情包关键词和文本内容，格式：表情包关键词 文本内容";
const MSG_SEND_FAILED: &str = "抱歉，发送图片时出错。";

/// Terminal state of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Rendered image to send back.
    Delivered(Bytes),
    /// Text to reply with (usage hint or a classified render failure).
    Rejected(String),
    /// Unclassified failure; nothing is sent.
    Suppressed,
}

/// Turns chat messages into render calls against the meme service.
#[derive(Clone)]
pub struct MemeHandler {
    catalog: Arc<CatalogStore>,
    render_client: RenderClient,
    avatars: Arc<dyn AvatarSource>,
    bot: Arc<dyn Bot>,
    command_prefix: Option<String>,
}

impl MemeHandler {
    pub fn new(
        catalog: Arc<CatalogStore>,
        render_client: RenderClient,
        avatars: Arc<dyn AvatarSource>,
        bot: Arc<dyn Bot>,
    ) -> Self {
        Self {
            catalog,
            render_client,
            avatars,
            bot,
            command_prefix: None,
        }
    }

    /// Only messages starting with `prefix` are requests; the prefix is stripped before parsing.
    pub fn with_command_prefix(mut self, prefix: Option<String>) -> Self {
        self.command_prefix = prefix;
        self
    }

    /// Returns the request text, or `None` when the message is not addressed to this handler.
    fn command_text<'a>(&self, text: &'a str) -> Option<&'a str> {
        match &self.command_prefix {
            Some(prefix) => {
                let rest = text.trim_start().strip_prefix(prefix.as_str())?;
                (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest)
            }
            None => Some(text),
        }
    }

    /// Runs parse → avatar resolution → render for one message. Never sends anything.
    #[instrument(skip(self, message, text), fields(message_id = %message.id))]
    pub async fn process(&self, message: &Message, text: &str) -> RequestOutcome {
        let catalog = self.catalog.snapshot().await;

        let extracted = match extract(&catalog, text, &message.elements) {
            Ok(extracted) => extracted,
            Err(ExtractError::MissingInput) => {
                info!(user_id = message.user.id, "No meme keyword, replying with usage hint");
                return RequestOutcome::Rejected(USAGE_HINT.to_string());
            }
        };

        let needs = AvatarNeeds::plan(
            extracted.max_images,
            extracted.supplied_images.len(),
            extracted.mentioned_user_id.is_some(),
        );
        let (sender_avatar, mentioned_avatar) = self
            .fetch_avatars(message.user.id, extracted.mentioned_user_id, needs)
            .await;
        let bundle = AvatarBundle {
            sender_avatar,
            mentioned_avatar,
            supplied_images: extracted.supplied_images,
        };
        let images = resolve_images(&bundle, extracted.max_images);

        info!(
            user_id = message.user.id,
            template_id = %extracted.template_id,
            texts = ?extracted.texts,
            images = images.len(),
            "Meme request resolved"
        );

        let request = MemeRequest {
            template_id: extracted.template_id,
            texts: extracted.texts,
            images,
        };

        match self.render_client.render(&catalog, &request).await {
            Ok(image) => RequestOutcome::Delivered(image),
            Err(e) => match e.user_message() {
                Some(text) => {
                    warn!(template_id = %request.template_id, error = %e, "Meme render rejected");
                    RequestOutcome::Rejected(text)
                }
                None => {
                    warn!(
                        template_id = %request.template_id,
                        error = %e,
                        "Meme render failed; no reply sent"
                    );
                    RequestOutcome::Suppressed
                }
            },
        }
    }

    /// Downloads the avatars `needs` asks for, concurrently. Returns `(sender, mentioned)`.
    async fn fetch_avatars(
        &self,
        sender_id: i64,
        mentioned_id: Option<i64>,
        needs: AvatarNeeds,
    ) -> (Option<Bytes>, Option<Bytes>) {
        let mentioned_id = mentioned_id.filter(|_| needs.mentioned);

        if needs.sender && mentioned_id == Some(sender_id) {
            let avatar = self.avatars.avatar(sender_id).await;
            return (avatar.clone(), avatar);
        }

        let sender = async {
            if needs.sender {
                self.avatars.avatar(sender_id).await
            } else {
                None
            }
        };
        let mentioned = async {
            match mentioned_id {
                Some(id) => self.avatars.avatar(id).await,
                None => None,
            }
        };
        tokio::join!(sender, mentioned)
    }

    /// Sends the outcome back to the chat and maps it to a chain response.
    async fn deliver(&self, message: &Message, outcome: RequestOutcome) -> HandlerResponse {
        match outcome {
            RequestOutcome::Delivered(image) => {
                if let Err(e) = self.bot.send_image(&message.chat, image).await {
                    error!(error = %e, "Failed to send meme image");
                    if let Err(e) = self.bot.reply_to(message, MSG_SEND_FAILED).await {
                        error!(error = %e, "Failed to send meme failure notice");
                    }
                }
                HandlerResponse::Stop
            }
            RequestOutcome::Rejected(text) => {
                if let Err(e) = self.bot.reply_to(message, &text).await {
                    error!(error = %e, "Failed to send meme rejection");
                }
                HandlerResponse::Continue
            }
            RequestOutcome::Suppressed => HandlerResponse::Continue,
        }
    }
}

#[async_trait]
impl Handler for MemeHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let text = message.plain_text();
        let Some(command) = self.command_text(&text) else {
            return Ok(HandlerResponse::Continue);
        };

        let outcome = self.process(message, command).await;
        Ok(self.deliver(message, outcome).await)
    }
}

/// Builds a [`MemeHandler`] from config: the render client comes from the config, avatars from
/// `avatars` (the transport's lookup, or [`url_avatar_source`]).
pub fn build_meme_handler(
    config: &MemeConfig,
    catalog: Arc<CatalogStore>,
    bot: Arc<dyn Bot>,
    avatars: Arc<dyn AvatarSource>,
) -> AnyResult<MemeHandler> {
    let render_client = RenderClient::new(
        config.api_url.clone(),
        Duration::from_secs(config.render_timeout_secs),
    )?;
    Ok(MemeHandler::new(catalog, render_client, avatars, bot)
        .with_command_prefix(config.command_prefix.clone()))
}

/// The URL-template avatar client, when `AVATAR_URL_TEMPLATE` is configured.
pub fn url_avatar_source(config: &MemeConfig) -> AnyResult<Option<AvatarClient>> {
    let Some(template) = config.avatar_url_template.as_ref() else {
        return Ok(None);
    };
    let client = AvatarClient::new(
        template.clone(),
        config.avatar_platform.clone(),
        Duration::from_secs(config.avatar_timeout_secs),
    )?;
    Ok(Some(client))
}
