// Game engine: one Texas Hold'em session from start to winner.

use std::sync::Arc;

use tracing::info;

use crate::blinds::{blind_schedule, AlertSink, BlindAlerter};
use crate::ledger::{LedgerError, PlayerStore};

/// A single game session as seen by the drivers.
///
/// A session is one `start` followed by one `finish`. Calling `finish` without
/// `start` is allowed and only records the win; reusing an engine for a second
/// session is not supported.
pub trait Game: Send + Sync {
    /// Schedule the blind alerts for `players` players into `alerts`.
    /// Returns immediately; alerts fire in the background.
    fn start(&self, players: u32, alerts: Arc<dyn AlertSink>);

    /// Record a win for `winner`.
    fn finish(&self, winner: &str) -> Result<(), LedgerError>;
}

pub struct TexasHoldem {
    alerter: Arc<dyn BlindAlerter>,
    store: Arc<dyn PlayerStore>,
}

impl TexasHoldem {
    pub fn new(alerter: Arc<dyn BlindAlerter>, store: Arc<dyn PlayerStore>) -> Self {
        Self { alerter, store }
    }
}

impl Game for TexasHoldem {
    fn start(&self, players: u32, alerts: Arc<dyn AlertSink>) {
        let schedule = blind_schedule(players);
        info!(
            "Starting game for {players} players ({} blind tiers)",
            schedule.len()
        );
        for alert in schedule {
            self.alerter
                .schedule_alert_at(alert.at, alert.amount, Arc::clone(&alerts));
        }
    }

    fn finish(&self, winner: &str) -> Result<(), LedgerError> {
        self.store.record_win(winner)?;
        info!("Game finished, {winner} wins");
        Ok(())
    }
}
