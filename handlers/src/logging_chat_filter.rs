//! Handlers for logging and chat filtering (group-only, chat allowlist).

use async_trait::async_trait;
use memebot_core::{ChatKind, Handler, HandlerError, HandlerResponse, Message, Result};
use tracing::{debug, info, instrument, warn};

/// Logs each message in before() and the response in after(); always continues.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            username = %message.user.username.as_deref().unwrap_or("unknown"),
            message_content = %message.plain_text(),
            images = message.image_count(),
            "Received message"
        );
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        debug!(
            message_id = %message.id,
            response = ?response,
            "Processed message"
        );
        Ok(())
    }
}

/// Stops the chain for private chats when `group_only` is set, and fails with
/// [`HandlerError::ChatNotAllowed`] for chats outside a non-empty allowlist.
pub struct ChatFilterHandler {
    group_only: bool,
    allowed_chats: Vec<i64>,
}

impl ChatFilterHandler {
    pub fn new(group_only: bool, allowed_chats: Vec<i64>) -> Self {
        Self {
            group_only,
            allowed_chats,
        }
    }
}

#[async_trait]
impl Handler for ChatFilterHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        let chat_id = message.chat.id;
        if !self.allowed_chats.is_empty() && !self.allowed_chats.contains(&chat_id) {
            warn!(chat_id, user_id = message.user.id, "Message from chat outside allowlist");
            return Err(HandlerError::ChatNotAllowed(chat_id).into());
        }
        if self.group_only && message.chat.kind == ChatKind::Private {
            debug!(chat_id, "Ignoring private chat");
            return Ok(false);
        }
        Ok(true)
    }
}
