//! # memebot-telegram
//!
//! Telegram 接入层：适配器、Bot 与 AvatarSource 实现、最小配置、REPL 运行。
//! 仅负责 Telegram 收发与消息链执行，表情包逻辑在 meme-handlers 中。

mod adapters;
mod avatar;
mod bot_adapter;
mod config;
mod files;
mod runner;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use avatar::TelegramAvatarSource;
pub use bot_adapter::TelegramBotAdapter;
pub use config::TelegramConfig;
pub use runner::{build_teloxide_bot, run_repl};
