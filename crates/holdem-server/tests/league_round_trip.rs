// Recording wins over HTTP against a file-backed store and reading them back.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use holdem_core::blinds::TokioAlerter;
use holdem_core::ledger::{FileSystemPlayerStore, Player, PlayerStore};
use holdem_server::router::PlayerServer;

fn scratch_store(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "holdem_round_trip_{label}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir.join("game.db.json")
}

async fn call(app: &Router, method: Method, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn recording_wins_and_retrieving_them() {
    let path = scratch_store("http");
    let store = Arc::new(FileSystemPlayerStore::open(&path).unwrap());
    let app = PlayerServer::new(store.clone(), Arc::new(TokioAlerter)).router();

    for _ in 0..3 {
        let (status, _) = call(&app, Method::POST, "/players/Pepper").await;
        assert_eq!(status, StatusCode::ACCEPTED);
    }
    call(&app, Method::POST, "/players/Floyd").await;

    let (status, body) = call(&app, Method::GET, "/players/Pepper").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "3");

    let (status, body) = call(&app, Method::GET, "/league").await;
    assert_eq!(status, StatusCode::OK);
    let league: Vec<Player> = serde_json::from_str(&body).unwrap();
    assert_eq!(
        league,
        vec![Player::new("Pepper", 3), Player::new("Floyd", 1)]
    );

    let reopened = FileSystemPlayerStore::open(&path).unwrap();
    assert_eq!(reopened.get_league(), store.get_league());

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[tokio::test]
async fn concurrent_posts_are_all_recorded() {
    let path = scratch_store("concurrent");
    let store = Arc::new(FileSystemPlayerStore::open(&path).unwrap());
    let app = PlayerServer::new(store.clone(), Arc::new(TokioAlerter)).router();

    let requests: Vec<_> = (0..100)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move { call(&app, Method::POST, &format!("/players/p{i}")).await })
        })
        .collect();
    for request in requests {
        assert_eq!(request.await.unwrap().0, StatusCode::ACCEPTED);
    }

    assert_eq!(store.get_league().len(), 100);
    let reopened = FileSystemPlayerStore::open(&path).unwrap();
    assert_eq!(reopened.get_league().len(), 100);

    let _ = fs::remove_dir_all(path.parent().unwrap());
}
