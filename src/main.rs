use anyhow::Result;
use cctv_monitor::api::rest::RestApi;
use cctv_monitor::config;
use cctv_monitor::db::DatabaseService;
use log::info;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // Config path from the first argument, then the environment
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CCTV_MONITOR_CONFIG").ok())
        .map(PathBuf::from);
    let mut config = config::load_config(config_path.as_deref())?;

    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database.url = url;
    }

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.api.log_level.as_str()),
    )
    .init();
    info!("Starting CCTV monitoring service");

    match &config_path {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("Using default configuration"),
    }
    if config.report.assume_online_without_history {
        info!("Cameras without status history are assumed online");
    } else {
        info!("Cameras without status history are assumed offline");
    }

    let database = DatabaseService::new(&config.database).await?;

    let http_server = RestApi::new(&config, &database)?;
    http_server.run().await?;

    info!("Shutdown complete");
    Ok(())
}
