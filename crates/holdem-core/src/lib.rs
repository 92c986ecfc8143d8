// Library root: the game engine, the win ledger, and the text driver shared by
// the webserver and the terminal client.

pub mod blinds;
pub mod cli;
pub mod config;
pub mod game;
pub mod ledger;
pub mod protocol;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
