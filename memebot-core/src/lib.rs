//! # memebot-core
//!
//! Core types and traits for the meme bot: [`Bot`], [`AvatarSource`], [`Handler`], message and user types,
//! and tracing initialization. Transport-agnostic; used by memebot-telegram, handler-chain and the handler crates.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{AvatarSource, Bot};
pub use error::{BotError, HandlerError, Result};
pub use logger::init_tracing;
pub use types::{
    Chat, ChatKind, Handler, HandlerResponse, Message, MessageElement, ToCoreMessage, ToCoreUser,
    User,
};
