// Poker league webserver entry point.
//
// Startup sequence:
// 1. Parse flags and load config
// 2. Initialize tracing (stdout)
// 3. Open the player store (fatal if missing directories cannot be created or
//    the file does not decode)
// 4. Serve the router until Ctrl-C

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use holdem_core::blinds::TokioAlerter;
use holdem_core::config;
use holdem_core::ledger::FileSystemPlayerStore;
use holdem_server::router::PlayerServer;

#[derive(Parser, Debug)]
#[command(author, version, about = "Poker league webserver", long_about = None)]
struct Args {
    /// Config file (defaults to ./holdem.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Player store file, overriding the config
    #[arg(long)]
    db: Option<PathBuf>,

    /// Listen port, overriding the config
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Flags and config
    let args = Args::parse();
    let mut config =
        config::load_config(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(db) = args.db {
        config.store.path = db;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate().context("invalid configuration")?;

    // 2. Tracing
    init_tracing(&config.logging.filter)?;
    info!("Poker webserver starting up");

    // 3. Player store
    let store = FileSystemPlayerStore::open(&config.store.path).with_context(|| {
        format!(
            "failed to open player store {}",
            config.store.path.display()
        )
    })?;
    info!("Player store opened at {}", store.path().display());

    // 4. Serve
    let server = PlayerServer::new(Arc::new(store), Arc::new(TokioAlerter));
    let addr = config.server.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, server.router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("axum server error")?;

    info!("Poker webserver shut down cleanly");
    Ok(())
}

fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
