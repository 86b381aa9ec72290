//! 头像查询：通过 Bot API 的 getUserProfilePhotos 取用户当前头像的最大尺寸。

use crate::files::download_photo;
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use memebot_core::AvatarSource;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::UserId;
use tracing::{debug, instrument, warn};

/// [`AvatarSource`] backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramAvatarSource {
    bot: teloxide::Bot,
    timeout: Duration,
}

impl TelegramAvatarSource {
    /// Each lookup (profile photos, getFile and download together) is bounded by `timeout`.
    pub fn new(bot: teloxide::Bot, timeout: Duration) -> Self {
        Self { bot, timeout }
    }

    /// Largest size of the user's current profile photo; `None` when the user has none
    /// (or hides it from bots).
    pub async fn fetch_avatar(&self, user_id: i64) -> Result<Option<Bytes>> {
        let user_id = u64::try_from(user_id).context("Telegram user ids are positive")?;
        let photos = self
            .bot
            .get_user_profile_photos(UserId(user_id))
            .limit(1)
            .await
            .context("get_user_profile_photos failed")?;
        let Some(largest) = photos.photos.first().and_then(|sizes| sizes.last()) else {
            return Ok(None);
        };
        let bytes = download_photo(&self.bot, largest).await?;
        Ok(Some(Bytes::from(bytes)))
    }
}

#[async_trait]
impl AvatarSource for TelegramAvatarSource {
    #[instrument(skip(self))]
    async fn avatar(&self, user_id: i64) -> Option<Bytes> {
        match tokio::time::timeout(self.timeout, self.fetch_avatar(user_id)).await {
            Ok(Ok(Some(bytes))) => {
                debug!(bytes = bytes.len(), "Avatar fetched");
                Some(bytes)
            }
            Ok(Ok(None)) => {
                debug!("User has no visible profile photo");
                None
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Avatar unavailable");
                None
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "Avatar lookup timed out");
                None
            }
        }
    }
}
