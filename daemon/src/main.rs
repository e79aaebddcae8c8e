//! Verity daemon — entry point for running the KYC platform server.

mod config;
mod logging;

use clap::Parser;
use config::DaemonConfig;
use logging::LogFormat;
use std::net::SocketAddr;
use std::sync::Arc;
use verity_kyc::TraceNotifier;
use verity_rpc::{AppState, RpcServer};
use verity_store_memory::MemoryStore;

#[derive(Parser)]
#[command(name = "verity-daemon", about = "Verity KYC platform daemon")]
struct Cli {
    /// Address to bind the REST API server to.
    #[arg(long, env = "VERITY_LISTEN")]
    listen: Option<String>,

    /// Secret used to sign bearer tokens.
    #[arg(long, env = "VERITY_TOKEN_SECRET")]
    token_secret: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "VERITY_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VERITY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base = match cli.config.as_deref() {
        Some(path) => DaemonConfig::from_toml_file(path)?,
        None => DaemonConfig::default(),
    };
    let config = DaemonConfig {
        listen: cli.listen.unwrap_or(base.listen),
        token_secret: cli.token_secret.unwrap_or(base.token_secret),
        log_format: cli.log_format.unwrap_or(base.log_format),
        log_level: cli.log_level.unwrap_or(base.log_level),
    };

    logging::init_logging(LogFormat::parse(&config.log_format), &config.log_level);

    if config.token_secret == "dev-secret-change-me" {
        tracing::warn!("running with the development token secret");
    }

    let addr: SocketAddr = config.listen.parse()?;
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store, &config.token_secret, Arc::new(TraceNotifier));

    tracing::info!(%addr, "starting verity daemon");
    RpcServer::new(addr, state).serve().await?;

    Ok(())
}
