//! Avatar lookup by platform user id.

use crate::error::AvatarError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use memebot_core::AvatarSource;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// QQ avatar CDN; `{platform}` and `{user_id}` are substituted per request.
/// Only meaningful when user ids are QQ numbers.
pub const DEFAULT_AVATAR_URL_TEMPLATE: &str =
    "http://q1.qlogo.cn/g?b={platform}&nk={user_id}&s=100";

/// Avatar download from a URL template, for hosts whose avatars are public by user id.
#[derive(Clone)]
pub struct AvatarClient {
    http: reqwest::Client,
    url_template: String,
    platform: String,
}

impl AvatarClient {
    pub fn new(
        url_template: impl Into<String>,
        platform: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build avatar HTTP client")?;
        Ok(Self {
            http,
            url_template: url_template.into(),
            platform: platform.into(),
        })
    }

    pub fn avatar_url(&self, user_id: i64) -> String {
        self.url_template
            .replace("{platform}", &self.platform)
            .replace("{user_id}", &user_id.to_string())
    }

    /// Downloads the avatar of `user_id`.
    pub async fn fetch_avatar(&self, user_id: i64) -> Result<Bytes, AvatarError> {
        let resp = self.http.get(self.avatar_url(user_id)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AvatarError::Status(status.as_u16()));
        }
        Ok(resp.bytes().await?)
    }

    /// Like [`fetch_avatar`](Self::fetch_avatar) but a failure only logs and yields `None`.
    #[instrument(skip(self))]
    pub async fn try_fetch_avatar(&self, user_id: i64) -> Option<Bytes> {
        match self.fetch_avatar(user_id).await {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), "Avatar fetched");
                Some(bytes)
            }
            Err(e) => {
                warn!(error = %e, "Avatar unavailable");
                None
            }
        }
    }
}

#[async_trait]
impl AvatarSource for AvatarClient {
    async fn avatar(&self, user_id: i64) -> Option<Bytes> {
        self.try_fetch_avatar(user_id).await
    }
}
