//! memebot CLI: run the Telegram meme bot, or refresh the local meme catalog.

use anyhow::Result;
use clap::Parser;
use memebot_cli::{fetch_catalog, load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let (telegram, meme) = load_config(token)?;
            run_bot(telegram, meme).await
        }
        Commands::FetchCatalog { output, api_url } => fetch_catalog(output, api_url).await,
    }
}
