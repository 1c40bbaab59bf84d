mod api;
mod auth;
mod cli;
mod config;
mod domain;
mod error;
mod failure;
mod i18n;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    output::print_banner();

    let cli = Cli::parse();
    info!("Starting synclens");
    cli.execute().await?;

    Ok(())
}
