//! 表情包功能配置：渲染服务地址、catalog 路径、头像服务、超时与触发规则。
//! 与外部交互：从环境变量加载（见各字段注释）。

use anyhow::{Context, Result};
use std::env;

/// Meme pipeline configuration.
#[derive(Debug, Clone)]
pub struct MemeConfig {
    /// MEME_API_URL
    pub api_url: String,
    /// MEME_CATALOG_PATH
    pub catalog_path: String,
    /// AVATAR_URL_TEMPLATE; `{platform}` and `{user_id}` are substituted. Unset means avatars
    /// come from the chat platform itself.
    pub avatar_url_template: Option<String>,
    /// AVATAR_PLATFORM
    pub avatar_platform: String,
    /// MEME_RENDER_TIMEOUT_SECS
    pub render_timeout_secs: u64,
    /// AVATAR_TIMEOUT_SECS
    pub avatar_timeout_secs: u64,
    /// MEME_COMMAND_PREFIX; when set only messages starting with it are treated as requests
    pub command_prefix: Option<String>,
    /// MEME_GROUP_ONLY; ignore private chats
    pub group_only: bool,
    /// ALLOWED_CHAT_IDS (comma separated); empty allows every chat
    pub allowed_chat_ids: Vec<i64>,
}

impl Default for MemeConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:2233".to_string(),
            catalog_path: "data/memes_info.yaml".to_string(),
            avatar_url_template: None,
            avatar_platform: "qq".to_string(),
            render_timeout_secs: 30,
            avatar_timeout_secs: 10,
            command_prefix: None,
            group_only: true,
            allowed_chat_ids: Vec::new(),
        }
    }
}

impl MemeConfig {
    /// Loads from environment variables; unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let allowed_chat_ids = match env::var("ALLOWED_CHAT_IDS") {
            Ok(raw) => parse_chat_ids(&raw)?,
            Err(_) => defaults.allowed_chat_ids,
        };
        Ok(Self {
            api_url: env::var("MEME_API_URL").unwrap_or(defaults.api_url),
            catalog_path: env::var("MEME_CATALOG_PATH").unwrap_or(defaults.catalog_path),
            avatar_url_template: env::var("AVATAR_URL_TEMPLATE")
                .ok()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .or(defaults.avatar_url_template),
            avatar_platform: env::var("AVATAR_PLATFORM").unwrap_or(defaults.avatar_platform),
            render_timeout_secs: env_parse("MEME_RENDER_TIMEOUT_SECS")
                .unwrap_or(defaults.render_timeout_secs),
            avatar_timeout_secs: env_parse("AVATAR_TIMEOUT_SECS")
                .unwrap_or(defaults.avatar_timeout_secs),
            command_prefix: env::var("MEME_COMMAND_PREFIX")
                .ok()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            group_only: env::var("MEME_GROUP_ONLY")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.group_only),
            allowed_chat_ids,
        })
    }

    /// Checks that the service URLs parse and timeouts are non-zero.
    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.api_url)
            .with_context(|| format!("MEME_API_URL is not a valid URL: {}", self.api_url))?;
        if let Some(template) = &self.avatar_url_template {
            let sample_avatar = template
                .replace("{platform}", &self.avatar_platform)
                .replace("{user_id}", "0");
            reqwest::Url::parse(&sample_avatar).with_context(|| {
                format!("AVATAR_URL_TEMPLATE does not produce a valid URL: {}", template)
            })?;
        }
        if self.render_timeout_secs == 0 || self.avatar_timeout_secs == 0 {
            anyhow::bail!(
                "MEME_RENDER_TIMEOUT_SECS and AVATAR_TIMEOUT_SECS must be greater than 0"
            );
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_chat_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .with_context(|| format!("ALLOWED_CHAT_IDS contains an invalid chat id: {}", s))
        })
        .collect()
}
