// HTTP routes: league table, per-player scores, the game page, and the game
// socket upgrade.

use std::sync::Arc;

use axum::{
    extract::{ws::WebSocketUpgrade, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use tracing::{error, info};

use holdem_core::blinds::BlindAlerter;
use holdem_core::game::{Game, TexasHoldem};
use holdem_core::ledger::PlayerStore;

use crate::socket;

const GAME_PAGE: &str = include_str!("../assets/game.html");

/// Builds the engine for each new socket session.
pub type GameFactory = Arc<dyn Fn() -> Arc<dyn Game> + Send + Sync>;

/// Shared state behind every route: the ledger and a way to start games.
#[derive(Clone)]
pub struct PlayerServer {
    store: Arc<dyn PlayerStore>,
    new_game: GameFactory,
}

impl PlayerServer {
    /// Each socket session gets a fresh [`TexasHoldem`] over `store`, firing
    /// blinds through `alerter`.
    pub fn new(store: Arc<dyn PlayerStore>, alerter: Arc<dyn BlindAlerter>) -> Self {
        let game_store = Arc::clone(&store);
        let new_game: GameFactory = Arc::new(move || {
            Arc::new(TexasHoldem::new(
                Arc::clone(&alerter),
                Arc::clone(&game_store),
            )) as Arc<dyn Game>
        });
        Self { store, new_game }
    }

    /// Serve socket sessions with games built by `new_game`.
    pub fn with_game_factory(store: Arc<dyn PlayerStore>, new_game: GameFactory) -> Self {
        Self { store, new_game }
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/league", get(league))
            .route("/players/:name", get(show_score).post(process_win))
            .route("/game", get(game_page))
            .route("/ws", get(game_socket))
            .with_state(self)
    }
}

async fn league(State(server): State<PlayerServer>) -> impl IntoResponse {
    Json(server.store.get_league())
}

/// 200 with the win count, or 404 when the count is zero. A player with no
/// wins cannot be told apart from an unknown one.
async fn show_score(
    State(server): State<PlayerServer>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let score = server.store.get_player_score(&name);
    let status = if score == 0 {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    (status, score.to_string())
}

async fn process_win(
    State(server): State<PlayerServer>,
    Path(name): Path<String>,
) -> StatusCode {
    match server.store.record_win(&name) {
        Ok(()) => {
            info!("Recorded win for {name}");
            StatusCode::ACCEPTED
        }
        Err(e) => {
            error!("Failed to record win for {name}: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

async fn game_page() -> Html<&'static str> {
    Html(GAME_PAGE)
}

async fn game_socket(
    State(server): State<PlayerServer>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let game = (server.new_game)();
    ws.on_upgrade(move |socket| socket::serve(socket, game))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use axum::response::Response;
    use holdem_core::ledger::Player;
    use holdem_core::testing::{SpyBlindAlerter, StubPlayerStore};
    use tower::ServiceExt;

    fn app(store: Arc<StubPlayerStore>) -> Router {
        PlayerServer::new(store, Arc::new(SpyBlindAlerter::default())).router()
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn scored_store() -> Arc<StubPlayerStore> {
        Arc::new(StubPlayerStore::new([("Pepper", 20), ("Floyd", 10)]))
    }

    #[tokio::test]
    async fn returns_pepper_score() {
        let response = app(scored_store())
            .oneshot(request(Method::GET, "/players/Pepper"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "20");
    }

    #[tokio::test]
    async fn returns_floyd_score() {
        let response = app(scored_store())
            .oneshot(request(Method::GET, "/players/Floyd"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "10");
    }

    #[tokio::test]
    async fn missing_player_is_404_with_zero_body() {
        let response = app(scored_store())
            .oneshot(request(Method::GET, "/players/Apollo"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "0");
    }

    #[tokio::test]
    async fn zero_win_player_is_also_404() {
        let store = Arc::new(StubPlayerStore::new([("Zed", 0)]));

        let response = app(store)
            .oneshot(request(Method::GET, "/players/Zed"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn post_records_a_win() {
        let store = Arc::new(StubPlayerStore::default());

        let response = app(store.clone())
            .oneshot(request(Method::POST, "/players/Pepper"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(body_text(response).await, "");
        assert_eq!(store.win_calls(), vec!["Pepper"]);
    }

    #[tokio::test]
    async fn player_names_are_percent_decoded() {
        let store = Arc::new(StubPlayerStore::default());

        app(store.clone())
            .oneshot(request(Method::POST, "/players/Mary%20Ann"))
            .await
            .unwrap();

        assert_eq!(store.win_calls(), vec!["Mary Ann"]);
    }

    #[tokio::test]
    async fn unpersisted_win_is_a_server_error() {
        let store = Arc::new(StubPlayerStore::default().rejecting_wins());

        let response = app(store)
            .oneshot(request(Method::POST, "/players/Pepper"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn league_is_returned_as_json() {
        let league = vec![
            Player::new("Cleo", 32),
            Player::new("Chris", 20),
            Player::new("Tiest", 14),
        ];
        let store = Arc::new(StubPlayerStore::default().with_league(league.clone()));

        let response = app(store)
            .oneshot(request(Method::GET, "/league"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let got: Vec<Player> = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(got, league);
    }

    #[tokio::test]
    async fn game_page_is_served() {
        let response = app(scored_store())
            .oneshot(request(Method::GET, "/game"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("new WebSocket("));
    }

    #[tokio::test]
    async fn socket_route_requires_an_upgrade() {
        let response = app(scored_store())
            .oneshot(request(Method::GET, "/ws"))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
