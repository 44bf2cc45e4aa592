use phonebook::config::Config;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Loading configuration...");
    let config = Config::load()?;

    tracing::info!("Starting phonebook server...");
    phonebook::server::run(config).await
}
