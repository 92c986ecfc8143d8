// Test doubles for the game engine and its collaborators.
//
// Public so the server crate's tests can drive sessions against the same
// spies the core tests use.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::blinds::{AlertSink, BlindAlerter, ScheduledAlert};
use crate::game::Game;
use crate::ledger::{LedgerError, Player, PlayerStore};

/// Records every alert it is asked to schedule instead of firing it.
#[derive(Default)]
pub struct SpyBlindAlerter {
    alerts: Mutex<Vec<ScheduledAlert>>,
}

impl SpyBlindAlerter {
    pub fn alerts(&self) -> Vec<ScheduledAlert> {
        self.alerts.lock().unwrap().clone()
    }
}

impl BlindAlerter for SpyBlindAlerter {
    fn schedule_alert_at(&self, at: Duration, amount: u32, _sink: Arc<dyn AlertSink>) {
        self.alerts
            .lock()
            .unwrap()
            .push(ScheduledAlert { at, amount });
    }
}

/// Collects delivered blind amounts in arrival order.
#[derive(Default)]
pub struct RecordingSink {
    amounts: Mutex<Vec<u32>>,
}

impl RecordingSink {
    pub fn amounts(&self) -> Vec<u32> {
        self.amounts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn deliver(&self, amount: u32) {
        self.amounts.lock().unwrap().push(amount);
    }
}

/// Player store with scripted scores that records wins instead of applying them.
#[derive(Default)]
pub struct StubPlayerStore {
    scores: HashMap<String, u32>,
    league: Vec<Player>,
    win_calls: Mutex<Vec<String>>,
    reject_wins: bool,
}

impl StubPlayerStore {
    pub fn new<'a>(scores: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        Self {
            scores: scores
                .into_iter()
                .map(|(name, wins)| (name.to_string(), wins))
                .collect(),
            ..Self::default()
        }
    }

    /// League returned verbatim by `get_league`.
    pub fn with_league(mut self, league: Vec<Player>) -> Self {
        self.league = league;
        self
    }

    /// Make every `record_win` fail as if the backing file could not be written.
    pub fn rejecting_wins(mut self) -> Self {
        self.reject_wins = true;
        self
    }

    pub fn win_calls(&self) -> Vec<String> {
        self.win_calls.lock().unwrap().clone()
    }
}

impl PlayerStore for StubPlayerStore {
    fn find(&self, name: &str) -> Option<Player> {
        self.scores.get(name).map(|&wins| Player::new(name, wins))
    }

    fn record_win(&self, name: &str) -> Result<(), LedgerError> {
        if self.reject_wins {
            return Err(LedgerError::Io {
                path: PathBuf::from("stub.db.json"),
                source: std::io::Error::other("stub store rejects writes"),
            });
        }
        self.win_calls.lock().unwrap().push(name.to_string());
        Ok(())
    }

    fn get_league(&self) -> Vec<Player> {
        self.league.clone()
    }
}

/// What a [`GameSpy`] was asked to do.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameCalls {
    pub started_with: Option<u32>,
    pub finished_with: Option<String>,
}

/// Game that records `start`/`finish` and can fire one blind alert on start.
#[derive(Default)]
pub struct GameSpy {
    blind_alert: Option<u32>,
    calls: Mutex<GameCalls>,
}

impl GameSpy {
    /// Deliver `amount` into the session's sink as soon as the game starts.
    pub fn with_blind_alert(amount: u32) -> Self {
        Self {
            blind_alert: Some(amount),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> GameCalls {
        self.calls.lock().unwrap().clone()
    }
}

impl Game for GameSpy {
    fn start(&self, players: u32, alerts: Arc<dyn AlertSink>) {
        self.calls.lock().unwrap().started_with = Some(players);
        if let Some(amount) = self.blind_alert {
            tokio::spawn(async move { alerts.deliver(amount).await });
        }
    }

    fn finish(&self, winner: &str) -> Result<(), LedgerError> {
        self.calls.lock().unwrap().finished_with = Some(winner.to_string());
        Ok(())
    }
}
