// Blind schedule and timed delivery of blind alerts.
//
// A game of P players raises the blind through a fixed table of amounts, one
// tier every (5 + P) minutes, starting immediately. The whole schedule is
// computed when the game starts and each tier is handed to a `BlindAlerter`,
// which fires it into the session's `AlertSink` once its delay has elapsed.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

/// Blind amounts in the order they are announced. The schedule ends with the
/// last tier.
pub const BLIND_AMOUNTS: [u32; 11] = [100, 200, 300, 400, 500, 600, 800, 1000, 2000, 4000, 8000];

/// Minutes added to the player count to get the gap between tiers.
const BASE_BLIND_MINUTES: u64 = 5;

/// One announcement: `amount` becomes the blind `at` after game start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledAlert {
    pub at: Duration,
    pub amount: u32,
}

impl fmt::Display for ScheduledAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} chips at {:?}", self.amount, self.at)
    }
}

/// Time between consecutive blind tiers for `players` players.
pub fn blind_increment(players: u32) -> Duration {
    Duration::from_secs((BASE_BLIND_MINUTES + u64::from(players)) * 60)
}

/// The full alert schedule for a game of `players` players, in firing order.
pub fn blind_schedule(players: u32) -> Vec<ScheduledAlert> {
    let increment = blind_increment(players);
    BLIND_AMOUNTS
        .iter()
        .zip(0u32..)
        .map(|(&amount, tier)| ScheduledAlert {
            at: increment * tier,
            amount,
        })
        .collect()
}

/// Where a session's blind alerts are delivered.
///
/// Delivery is best effort: a sink whose reader has gone away drops the alert.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, amount: u32);
}

/// Schedules a single alert into a sink.
pub trait BlindAlerter: Send + Sync {
    /// Arrange for `amount` to be delivered to `sink` after `at` has elapsed.
    /// Must not block the caller.
    fn schedule_alert_at(&self, at: Duration, amount: u32, sink: Arc<dyn AlertSink>);
}

/// Fires each alert from its own tokio task after sleeping for its delay.
///
/// Alerts are fire-and-forget: nothing is retried, and alerts still pending
/// when the runtime shuts down are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioAlerter;

impl BlindAlerter for TokioAlerter {
    fn schedule_alert_at(&self, at: Duration, amount: u32, sink: Arc<dyn AlertSink>) {
        debug!("Scheduling blind {amount} in {at:?}");
        tokio::spawn(async move {
            tokio::time::sleep(at).await;
            debug!("Blind is now {amount}");
            sink.deliver(amount).await;
        });
    }
}
