//! Mock implementation of [`memebot_core::Bot`] that records every outgoing reply.

use async_trait::async_trait;
use bytes::Bytes;
use memebot_core::{Bot, BotError, Chat, Message, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One recorded outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { chat_id: i64, text: String },
    Image { chat_id: i64, image: Bytes },
}

#[derive(Default)]
pub struct MockBot {
    sent: Mutex<Vec<Sent>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl MockBot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails with a transport error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of send calls, successful or not.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn record(&self, sent: Sent) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(BotError::Bot("telegram unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.record(Sent::Text {
            chat_id: chat.id,
            text: text.to_string(),
        })
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }

    async fn send_image(&self, chat: &Chat, image: Bytes) -> Result<()> {
        self.record(Sent::Image {
            chat_id: chat.id,
            image,
        })
    }
}
