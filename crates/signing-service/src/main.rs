use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use signing_service::{AppState, Config, SigningService, run};

#[derive(Parser)]
struct Args {
    #[clap(long, default_value = "127.0.0.1")]
    host: String,
    #[clap(long, default_value = "3000")]
    port: u16,
    /// JSON file listing keys and per-endpoint key usages.
    #[clap(long, env = "SIGNER_CONFIG")]
    config: PathBuf,
    #[clap(long, env = "SIGNER_LOG_LEVEL", default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting tracing subscriber")?;

    let config = Config::from_file(&args.config)?;
    let key_store = config.build_key_store()?;
    let policy = config.key_usage_policy();
    info!(keys = key_store.len(), "key store ready");

    let service = SigningService::new(policy, Arc::new(key_store));
    run(&args.host, args.port, AppState::new(service)).await
}
