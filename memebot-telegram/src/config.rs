//! 框架最小配置：仅 token、API URL、日志路径。
//! 与外部交互：从环境变量 BOT_TOKEN、TELEGRAM_API_URL（或 TELOXIDE_API_URL）、LOG_FILE 加载。

use anyhow::Result;
use std::env;

/// Telegram 接入与日志配置。
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub telegram_api_url: Option<String>,
    pub log_file: Option<String>,
}

impl TelegramConfig {
    /// 从环境变量加载：BOT_TOKEN 必填，TELEGRAM_API_URL、LOG_FILE 可选。
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// 同 [`Self::from_env`]，但 `token` 非空时覆盖 BOT_TOKEN。
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN").map_err(|_| anyhow::anyhow!("BOT_TOKEN not set"))?,
        };
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file = env::var("LOG_FILE").ok();
        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
        })
    }

    /// 使用给定 token 构造，其余为 None。
    pub fn with_token(bot_token: String) -> Self {
        Self {
            bot_token,
            telegram_api_url: None,
            log_file: None,
        }
    }

    /// token 不能为空；设置了 API URL 时必须可解析。
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("BOT_TOKEN is empty");
        }
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }
}
