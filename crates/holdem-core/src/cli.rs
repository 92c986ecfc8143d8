// Line-oriented text driver.
//
// One pass per session: prompt for the player count, start the game with the
// output stream as its blind-alert sink, then read "<name> wins" and finish.
// Bad input is reported on the output and ends the session early.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::blinds::AlertSink;
use crate::game::Game;
use crate::protocol::{
    extract_text_winner, parse_player_count, text_blind_alert, BAD_PLAYER_INPUT_ERR_MSG,
    BAD_WINNER_INPUT_MSG, PLAYER_PROMPT,
};

/// Output stream shared between the driver and the blind timers.
///
/// Every write takes the lock, so alerts never interleave mid-line with
/// prompts or with each other.
pub struct SharedOutput<W> {
    inner: Arc<Mutex<W>>,
}

impl<W> Clone for SharedOutput<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: AsyncWrite + Unpin + Send> SharedOutput<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(writer)),
        }
    }

    pub async fn write_str(&self, text: &str) -> std::io::Result<()> {
        let mut writer = self.inner.lock().await;
        writer.write_all(text.as_bytes()).await?;
        writer.flush().await
    }

    /// Run `f` against the underlying writer while holding the lock.
    pub async fn with_inner<T>(&self, f: impl FnOnce(&W) -> T) -> T {
        f(&*self.inner.lock().await)
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send + 'static> AlertSink for SharedOutput<W> {
    async fn deliver(&self, amount: u32) {
        if let Err(e) = self.write_str(&text_blind_alert(amount)).await {
            warn!("Dropped blind alert {amount}: {e}");
        }
    }
}

/// How a text session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The game ran and the win was recorded.
    Finished { players: u32, winner: String },
    /// The player count was not a number; the game never started.
    BadPlayerCount,
    /// The winner line was malformed; the game started but no win was recorded.
    BadWinner,
}

pub struct Cli<R, W> {
    input: R,
    output: SharedOutput<W>,
    game: Arc<dyn Game>,
}

impl<R, W> Cli<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(input: R, output: SharedOutput<W>, game: Arc<dyn Game>) -> Self {
        Self {
            input,
            output,
            game,
        }
    }

    /// Run one session.
    ///
    /// Errors are I/O failures on the streams or a win that could not be
    /// persisted; malformed input is reported through [`SessionOutcome`].
    pub async fn play_poker(&mut self) -> anyhow::Result<SessionOutcome> {
        self.output
            .write_str(PLAYER_PROMPT)
            .await
            .context("failed to write player prompt")?;

        let count_line = self.read_line().await?;
        let Some(players) = parse_player_count(&count_line) else {
            warn!("Rejected player count {count_line:?}");
            self.output
                .write_str(BAD_PLAYER_INPUT_ERR_MSG)
                .await
                .context("failed to write error message")?;
            return Ok(SessionOutcome::BadPlayerCount);
        };

        self.game.start(players, Arc::new(self.output.clone()));

        let winner_line = self.read_line().await?;
        let Some(winner) = extract_text_winner(&winner_line) else {
            warn!("Rejected winner line {winner_line:?}");
            self.output
                .write_str(BAD_WINNER_INPUT_MSG)
                .await
                .context("failed to write error message")?;
            return Ok(SessionOutcome::BadWinner);
        };

        self.game
            .finish(winner)
            .with_context(|| format!("failed to record win for {winner}"))?;
        info!("Text session finished: {players} players, {winner} won");

        Ok(SessionOutcome::Finished {
            players,
            winner: winner.to_string(),
        })
    }

    /// Next line without its line ending. End of input reads as an empty line.
    /// Invalid UTF-8 is replaced rather than rejected, so it fails parsing
    /// like any other malformed line.
    async fn read_line(&mut self) -> anyhow::Result<String> {
        let mut buf = Vec::new();
        self.input
            .read_until(b'\n', &mut buf)
            .await
            .context("failed to read from input")?;
        let line = String::from_utf8_lossy(&buf);
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}
