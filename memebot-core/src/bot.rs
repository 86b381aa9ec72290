//! Bot abstraction for sending replies, and the avatar lookup that goes with a transport.
//!
//! [`Bot`] and [`AvatarSource`] are transport-agnostic; memebot-telegram implements both via teloxide.

use crate::error::Result;
use crate::types::{Chat, Message};
use async_trait::async_trait;
use bytes::Bytes;

/// Abstraction for sending replies. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;
    /// Sends a text reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;
    /// Sends an image (raw encoded bytes, e.g. PNG or GIF) to the given chat.
    async fn send_image(&self, chat: &Chat, image: Bytes) -> Result<()>;
}

/// Looks up a user's avatar image by platform user id.
///
/// Failures (no avatar, network, timeout) are logged by the implementation and reported as `None`.
#[async_trait]
pub trait AvatarSource: Send + Sync {
    async fn avatar(&self, user_id: i64) -> Option<Bytes>;
}
