// Non-durable PlayerStore, for tests and throwaway sessions.

use std::sync::RwLock;

use super::{League, LedgerError, Player, PlayerStore};

#[derive(Default)]
pub struct InMemoryPlayerStore {
    league: RwLock<League>,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_league(league: League) -> Self {
        Self {
            league: RwLock::new(league),
        }
    }
}

impl PlayerStore for InMemoryPlayerStore {
    fn find(&self, name: &str) -> Option<Player> {
        self.league
            .read()
            .expect("player store lock poisoned")
            .find(name)
            .cloned()
    }

    fn record_win(&self, name: &str) -> Result<(), LedgerError> {
        self.league
            .write()
            .expect("player store lock poisoned")
            .record_win(name);
        Ok(())
    }

    fn get_league(&self) -> Vec<Player> {
        self.league
            .read()
            .expect("player store lock poisoned")
            .ranked()
    }
}
