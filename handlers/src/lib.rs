//! # Handlers for the memebot framework
//!
//! Cross-cutting handlers that run around the meme pipeline: logging and chat filtering.

mod logging_chat_filter;


pub use logging_chat_filter::{ChatFilterHandler, LoggingHandler};
