use anyhow::{Error, Result};
use email_dispatch::config::DispatchConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = DispatchConfig::load()?;
    config.validate()?;

    info!("Configuration validated. Dispatcher is ready to run.");

    Ok(())
}
