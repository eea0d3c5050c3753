mod auth;
mod cli;
mod config;
mod error;
mod models;
mod providers;
mod registry;
mod render;
mod time;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    info!("Starting Ju - CI dashboard widgets");
    cli.execute().await?;

    Ok(())
}
