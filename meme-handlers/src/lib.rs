//! # meme-handlers
//!
//! The meme request pipeline and its [`memebot_core::Handler`]:
//! keyword resolution and argument extraction ([`extractor`]), image selection ([`avatar_policy`]),
//! then the render call and reply ([`MemeHandler`]).

pub mod avatar_policy;
mod config;
pub mod extractor;
mod meme_handler;

pub use avatar_policy::{resolve_images, AvatarBundle, AvatarNeeds};
pub use config::MemeConfig;
pub use extractor::{extract, ExtractError, Extracted};
pub use meme_handler::{
    build_meme_handler, url_avatar_source, MemeHandler, RequestOutcome, USAGE_HINT,
};
