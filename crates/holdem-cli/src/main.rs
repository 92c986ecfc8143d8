// Terminal poker entry point: one game session over stdin/stdout.
//
// Startup sequence:
// 1. Parse flags and load config
// 2. Initialize tracing (log to file, not the terminal the game uses)
// 3. Open the player store
// 4. Run one text session

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::{info, warn};

use holdem_core::blinds::TokioAlerter;
use holdem_core::cli::{Cli, SessionOutcome, SharedOutput};
use holdem_core::config;
use holdem_core::game::TexasHoldem;
use holdem_core::ledger::FileSystemPlayerStore;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play one game of poker from the terminal", long_about = None)]
struct Args {
    /// Config file (defaults to ./holdem.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Player store file, overriding the config
    #[arg(long)]
    db: Option<PathBuf>,
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
    config.validate().context("invalid configuration")?;

    // 2. Tracing
    init_tracing(&config.logging.filter)?;
    info!("Poker CLI starting up");

    // 3. Player store
    let store = FileSystemPlayerStore::open(&config.store.path).with_context(|| {
        format!(
            "failed to open player store {}",
            config.store.path.display()
        )
    })?;

    // 4. One session
    let output = SharedOutput::new(tokio::io::stdout());
    output.write_str("Let's play poker\n").await?;
    output
        .write_str("Type `{Name} wins` to record a win\n")
        .await?;

    let game = TexasHoldem::new(Arc::new(TokioAlerter), Arc::new(store));
    let mut cli = Cli::new(BufReader::new(tokio::io::stdin()), output, Arc::new(game));

    match cli.play_poker().await? {
        SessionOutcome::Finished { players, winner } => {
            info!("Recorded {winner} as winner of a {players}-player game");
        }
        outcome => warn!("Session ended without a result: {outcome:?}"),
    }

    Ok(())
}

/// Initialize tracing to log to a file (the terminal carries the game).
fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("holdem-cli.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
