use client::Stores;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;

use crate::{commands::Runner, error::Result};

#[tokio::main]
async fn main() -> Result<()> {
    let invocation = config::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("finboard=info,client=info,ledger=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(base_url = %invocation.config.base_url, "starting");
    let stores = Stores::connect(&invocation.config.base_url)?;
    let runner = Runner::new(stores, invocation.config, invocation.json);

    if let Err(err) = run(&runner, invocation.command).await {
        tracing::error!("{err}");
        return Err(err);
    }
    Ok(())
}

async fn run(runner: &Runner, command: config::Command) -> Result<()> {
    runner.authenticate().await?;
    runner.run(command).await
}
