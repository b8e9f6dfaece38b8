use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use ord_reporting::config::Config;
use ord_reporting::server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Configuration first: a missing key must stop the process before
    // anything is served.
    let config = Config::from_env()?;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🚀 starting ORD reporting server, config: {config:?}");
    server::run(config).await
}
