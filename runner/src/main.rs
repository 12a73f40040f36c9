use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod scenario;

use config::RunnerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("starting the omnioft runner");

    let config = RunnerConfig::load()?;
    info!(
        local_eid = config.chains.local_eid,
        remote_eid = config.chains.remote_eid,
        token = config.token.symbol.as_str(),
        "configuration loaded"
    );

    scenario::run(&config).await
}
