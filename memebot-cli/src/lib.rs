//! # memebot-cli
//!
//! CLI foundation: argument parsing, config loading, bot assembly.

pub mod app;
pub mod cli;

pub use app::{
    build_handler_chain, fetch_catalog, run_bot, select_avatar_source, spawn_reload_on_sighup,
};
pub use cli::{load_config, Cli, Commands};
