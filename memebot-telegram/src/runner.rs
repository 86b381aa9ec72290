//! REPL 运行：将 teloxide 消息转为 core::Message 后交给 HandlerChain 处理。
//! 与外部交互：调用 teloxide REPL、get_file/download_file 下载图片、HandlerChain。

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use handler_chain::HandlerChain;
use memebot_core::{MessageElement, ToCoreMessage};
use teloxide::prelude::*;
use tracing::{error, info, instrument, warn};

use super::adapters::TelegramMessageWrapper;
use super::config::TelegramConfig;
use super::files::download_photo;

/// 按配置构造 teloxide Bot；设置了 API URL 时指向该地址。
pub fn build_teloxide_bot(config: &TelegramConfig) -> Result<teloxide::Bot> {
    let bot = teloxide::Bot::new(config.bot_token.clone());
    match config.telegram_api_url {
        Some(ref url_str) => {
            let url = reqwest::Url::parse(url_str)
                .map_err(|e| anyhow::anyhow!("Invalid TELEGRAM_API_URL {}: {}", url_str, e))?;
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

/// 下载消息中最大尺寸的图片，返回 base64 字符串；无图片或下载失败时返回 None。
async fn download_largest_photo(
    bot: &teloxide::Bot,
    msg: &teloxide::types::Message,
) -> Option<String> {
    let photo = msg.photo()?.last()?;
    match download_photo(bot, photo).await {
        Ok(bytes) => Some(STANDARD.encode(&bytes)),
        Err(e) => {
            warn!(error = %e, "Photo download failed, dropping photo");
            None
        }
    }
}

/// 使用给定的 teloxide Bot 与 HandlerChain 启动 REPL。
/// 每条消息转为 core::Message（附带已下载的图片）后在独立任务中交给 chain.handle。
#[instrument(skip(bot, handler_chain))]
pub async fn run_repl(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        info!(username = ?me.user.username, "Bot connected");
    }

    let chain = handler_chain;
    teloxide::repl(bot, move |bot: Bot, msg: teloxide::types::Message| {
        let chain = chain.clone();

        async move {
            let mut core_msg = TelegramMessageWrapper(&msg).to_core();

            tokio::spawn(async move {
                if let Some(base64) = download_largest_photo(&bot, &msg).await {
                    core_msg.elements.insert(0, MessageElement::Image { base64 });
                }
                info!(
                    user_id = core_msg.user.id,
                    chat_id = core_msg.chat.id,
                    message_id = %core_msg.id,
                    "step: processing message (handler chain started)"
                );
                if let Err(e) = chain.handle(&core_msg).await {
                    error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
                }
            });

            Ok(())
        }
    })
    .await;

    Ok(())
}
