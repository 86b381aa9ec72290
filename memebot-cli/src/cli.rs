//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use meme_handlers::MemeConfig;
use memebot_telegram::TelegramConfig;

#[derive(Parser, Debug)]
#[command(name = "memebot")]
#[command(about = "Telegram meme bot CLI: run, fetch-catalog", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Fetch template metadata from the render service and write the catalog YAML.
    FetchCatalog {
        /// Output path; defaults to MEME_CATALOG_PATH.
        #[arg(short, long)]
        output: Option<String>,
        /// Render service base URL; defaults to MEME_API_URL.
        #[arg(long)]
        api_url: Option<String>,
    },
}

/// Loads both configs from the environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<(TelegramConfig, MemeConfig)> {
    let telegram = TelegramConfig::load(token)?;
    telegram.validate()?;

    let meme = MemeConfig::from_env()?;
    meme.validate()?;
    Ok((telegram, meme))
}
