// Player win counts: the in-memory League model and the stores that hold it.
//
// Every store rewrites its whole collection on a recorded win. A store that
// needs to absorb many more writes would swap the rewrite for an append-only
// log replayed into a League on open and compacted periodically; the
// `PlayerStore` trait is the seam for that.

pub mod file_store;
pub mod league;
pub mod memory_store;

use std::path::PathBuf;

use thiserror::Error;

pub use file_store::FileSystemPlayerStore;
pub use league::{League, Player};
pub use memory_store::InMemoryPlayerStore;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to access player store {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode player store {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode league: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable mapping from player name to cumulative win count.
///
/// Each call is its own atomic unit; implementations serialize readers against
/// writers over the whole collection.
pub trait PlayerStore: Send + Sync {
    /// Exact, case-sensitive lookup. Absence is not an error.
    fn find(&self, name: &str) -> Option<Player>;

    /// Win count for `name`, or 0 when the player has never been recorded.
    ///
    /// A missing player and a player with zero wins are indistinguishable here.
    fn get_player_score(&self, name: &str) -> u32 {
        self.find(name).map_or(0, |player| player.wins)
    }

    /// Increment `name`'s wins, appending a new record with one win if absent.
    ///
    /// On error the win has not been accepted: the store is unchanged.
    fn record_win(&self, name: &str) -> Result<(), LedgerError>;

    /// All players ranked by wins, descending. Ties keep insertion order.
    fn get_league(&self) -> Vec<Player>;
}
