// Socket driver: one game session over an upgraded WebSocket connection.
//
// The client sends exactly two text messages: the player count, then the
// winner's name (raw, without the " wins" suffix the text driver expects).
// Blind alerts are pushed back as text frames carrying the bare amount while
// the session waits for the winner.

use std::fmt::Display;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use holdem_core::blinds::AlertSink;
use holdem_core::game::Game;
use holdem_core::protocol::{extract_socket_winner, parse_socket_player_count, socket_blind_alert};

/// Outbound half of a socket, shared by the blind timers of one session.
pub struct SocketSink<S> {
    sink: Mutex<S>,
}

impl<S> SocketSink<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    /// Run `f` against the wrapped sink while holding the lock.
    pub async fn with_inner<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        f(&*self.sink.lock().await)
    }
}

#[async_trait]
impl<S> AlertSink for SocketSink<S>
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display,
{
    async fn deliver(&self, amount: u32) {
        let mut sink = self.sink.lock().await;
        if let Err(e) = sink.send(Message::Text(socket_blind_alert(amount))).await {
            debug!("Dropped blind alert {amount}, socket gone: {e}");
        }
    }
}

/// How a socket session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketOutcome {
    /// Both messages arrived and the win was recorded.
    Finished { players: u32, winner: String },
    /// The client went away before sending both messages.
    Closed,
}

/// Drive a freshly upgraded connection to the end of its session.
///
/// Pending blind timers hold the outbound half, so the connection is only
/// released once the last scheduled alert has fired, even after the session
/// has finished.
pub async fn serve(socket: WebSocket, game: Arc<dyn Game>) {
    info!("Game socket connected");
    let (outbound, inbound) = socket.split();
    let alerts = Arc::new(SocketSink::new(outbound));

    match run_session(inbound, alerts, game).await {
        Ok(outcome) => info!("Game socket session ended: {outcome:?}"),
        Err(e) => warn!("Game socket session failed: {e:#}"),
    }
}

/// Read the two session messages from `inbound` and drive `game` with them.
///
/// Generic over the inbound stream so it can be exercised with in-memory
/// streams without opening a socket.
pub async fn run_session<St, E>(
    mut inbound: St,
    alerts: Arc<dyn AlertSink>,
    game: Arc<dyn Game>,
) -> anyhow::Result<SocketOutcome>
where
    St: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let Some(count) = next_text(&mut inbound).await else {
        return Ok(SocketOutcome::Closed);
    };
    let players = parse_socket_player_count(&count);
    if count.trim().parse::<u32>().is_err() {
        warn!("Unparsable player count {count:?}, starting with {players}");
    }
    game.start(players, alerts);

    let Some(message) = next_text(&mut inbound).await else {
        return Ok(SocketOutcome::Closed);
    };
    let winner = extract_socket_winner(&message);
    game.finish(winner)
        .with_context(|| format!("failed to record win for {winner}"))?;

    Ok(SocketOutcome::Finished {
        players,
        winner: winner.to_string(),
    })
}

/// Wait for the next text message, skipping control and binary frames.
/// Returns `None` once the client closes or the stream fails.
async fn next_text<St, E>(inbound: &mut St) -> Option<String>
where
    St: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    while let Some(frame) = inbound.next().await {
        match frame {
            Ok(Message::Text(text)) => return Some(text),
            Ok(Message::Close(_)) => {
                info!("Client sent close frame");
                return None;
            }
            Err(e) => {
                warn!("Game socket error: {e}");
                return None;
            }
            _ => {
                // Ignore Binary, Ping, Pong frames.
            }
        }
    }
    None
}
