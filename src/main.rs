use gap_analysis::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gap_analysis=info,tower_http=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing credentials stop the process here, before anything is bound.
    let config = Config::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    gap_analysis::run(config).await
}
