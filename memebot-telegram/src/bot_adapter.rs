//! Wraps teloxide::Bot and implements [`memebot_core::Bot`]. Production code sends via Telegram; tests substitute another Bot impl.

use async_trait::async_trait;
use bytes::Bytes;
use memebot_core::{Bot as CoreBot, BotError, Chat, Message, Result};
use teloxide::{prelude::*, types::ChatId, types::InputFile};

/// Thin wrapper around teloxide::Bot that implements memebot-core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

fn is_gif(image: &[u8]) -> bool {
    image.starts_with(b"GIF8")
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }

    async fn send_image(&self, chat: &Chat, image: Bytes) -> Result<()> {
        // send_photo would flatten an animated GIF to its first frame
        let result = if is_gif(&image) {
            let input = InputFile::memory(image.to_vec()).file_name("meme.gif");
            self.bot
                .send_animation(ChatId(chat.id), input)
                .await
                .map(|_| ())
        } else {
            let input = InputFile::memory(image.to_vec()).file_name("meme.png");
            self.bot.send_photo(ChatId(chat.id), input).await.map(|_| ())
        };
        result.map_err(|e| BotError::Bot(e.to_string()))
    }
}
