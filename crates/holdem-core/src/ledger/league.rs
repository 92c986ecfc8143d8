// League model: the ordered collection of player records and its ranking.

use std::io::Read;

use serde::{Deserialize, Serialize};

/// One row of the ledger. Serialized as `{"Name": ..., "Wins": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Wins")]
    pub wins: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, wins: u32) -> Self {
        Self {
            name: name.into(),
            wins,
        }
    }
}

/// Player records in the order they were first recorded.
///
/// Holds at most one record per name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct League(Vec<Player>);

impl League {
    pub fn new(players: Vec<Player>) -> Self {
        Self(players)
    }

    /// Decode a JSON array of players. A literal `null` decodes as empty.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        let players: Option<Vec<Player>> = serde_json::from_reader(reader)?;
        Ok(Self(players.unwrap_or_default()))
    }

    pub fn find(&self, name: &str) -> Option<&Player> {
        self.0.iter().find(|player| player.name == name)
    }

    /// Add one win for `name` and return the new total.
    pub fn record_win(&mut self, name: &str) -> u32 {
        match self.0.iter_mut().find(|player| player.name == name) {
            Some(player) => {
                player.wins += 1;
                player.wins
            }
            None => {
                self.0.push(Player::new(name, 1));
                1
            }
        }
    }

    /// Copy of the records sorted by wins, descending.
    ///
    /// `sort_by` is stable, so equal win counts keep insertion order.
    pub fn ranked(&self) -> Vec<Player> {
        let mut ranked = self.0.clone();
        ranked.sort_by(|a, b| b.wins.cmp(&a.wins));
        ranked
    }

    pub fn players(&self) -> &[Player] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
