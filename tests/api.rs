use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use baobab_golf_back::{
    config::AppConfig,
    dao::golf_store::memory::MemoryGolfStore,
    routes,
    state::{AppState, SharedState},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    state: SharedState,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let state = AppState::new(AppConfig::default());
        state.install_store(Arc::new(MemoryGolfStore::new())).await;
        Self::with_state(state)
    }

    fn degraded() -> Self {
        Self::with_state(AppState::new(AppConfig::default()))
    }

    fn with_state(state: SharedState) -> Self {
        let router = routes::router(state.clone());
        Self { state, router }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn register(&self, user: &str, name: &str, role: &str) {
        let (status, _) = self
            .call(
                Method::POST,
                "/users/me",
                Some(user),
                Some(json!({"full_name": name, "role": role})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    /// Register a scorekeeper with a team and start a game; returns the game id.
    async fn start_game(&self, user: &str, team: &str, holes: u8) -> String {
        self.register(user, &format!("{team} Keeper"), "scorekeeper")
            .await;
        let (status, _) = self
            .call(
                Method::POST,
                "/teams",
                Some(user),
                Some(json!({"name": team, "teammates": ["Bo", "Cy", "Di"]})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, game) = self
            .call(Method::POST, "/games", Some(user), Some(json!({"holes": holes})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        game["id"].as_str().unwrap().to_string()
    }

    async fn save_hole(&self, user: &str, game: &str, hole: u8, scores: Value) -> (StatusCode, Value) {
        self.call(
            Method::PUT,
            &format!("/games/{game}/holes/{hole}"),
            Some(user),
            Some(json!({ "scores": scores })),
        )
        .await
    }
}

#[tokio::test]
async fn healthcheck_reports_degraded_without_store() {
    let app = TestApp::degraded();
    let (status, body) = app.call(Method::GET, "/healthcheck", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");

    let (status, _) = app.call(Method::GET, "/leaderboard", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let app = TestApp::new().await;
    let (_, body) = app.call(Method::GET, "/healthcheck", None, None).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn three_holes_of_a_nine_hole_round() {
    let app = TestApp::new().await;
    let game = app.start_game("keeper-1", "Eagles", 9).await;

    let (status, card) = app
        .save_hole(
            "keeper-1",
            &game,
            1,
            json!({"player1": 4, "player2": "5", "player3": 6, "player4": 7}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["hole_aggregates"][0], 9);
    assert_eq!(card["game"]["current_hole"], 2);

    app.save_hole(
        "keeper-1",
        &game,
        2,
        json!({"player1": 3, "player2": 4, "player3": 3, "player4": 5}),
    )
    .await;
    let (_, card) = app
        .save_hole(
            "keeper-1",
            &game,
            3,
            json!({"player1": 6, "player2": 6, "player3": 5, "player4": 6}),
        )
        .await;

    assert_eq!(card["team_total"], 26);
    assert_eq!(card["team_total_display"], "+26");
    assert_eq!(card["through"], 3);
    assert_eq!(card["players"][0]["player_name"], "Eagles Keeper");
    assert_eq!(card["players"][0]["total"], 13);

    let (_, fetched) = app
        .call(Method::GET, &format!("/games/{game}"), None, None)
        .await;
    assert_eq!(fetched["team_total"], 26);

    let (_, board) = app.call(Method::GET, "/leaderboard", None, None).await;
    assert_eq!(board["scope"], "active");
    assert_eq!(board["rows"][0]["rank"], 1);
    assert_eq!(board["rows"][0]["total"], 26);
    assert_eq!(board["rows"][0]["through_display"], "3");
}

#[tokio::test]
async fn malformed_and_unknown_scores_are_skipped() {
    let app = TestApp::new().await;
    let game = app.start_game("keeper-1", "Eagles", 9).await;

    let (status, card) = app
        .save_hole(
            "keeper-1",
            &game,
            1,
            json!({"player1": 4, "player2": "", "player3": null, "player4": 0, "player9": 2}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["hole_aggregates"][0], Value::Null);
    assert_eq!(card["team_total"], 0);
    assert_eq!(card["team_total_display"], "E");
    assert_eq!(card["players"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn oversized_strokes_count_as_unset() {
    let app = TestApp::new().await;
    let game = app.start_game("keeper-1", "Eagles", 9).await;

    let (status, card) = app
        .save_hole(
            "keeper-1",
            &game,
            1,
            json!({"player1": 3_000_000_000u64, "player2": 3_000_000_000u64, "player3": 4, "player4": 256}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["hole_aggregates"][0], Value::Null);
    assert_eq!(card["team_total"], 0);
    assert_eq!(card["players"][2]["total"], 4);

    let (status, fetched) = app
        .call(Method::GET, &format!("/games/{game}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["team_total"], 0);

    let (status, board) = app.call(Method::GET, "/leaderboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["rows"][0]["total"], 0);
}

#[tokio::test]
async fn leaderboard_sorts_teams_ascending() {
    let app = TestApp::new().await;
    let totals = [("keeper-a", "Fifteen", 7, 8), ("keeper-b", "Nine", 4, 5), ("keeper-c", "TwentyTwo", 11, 11)];

    for (user, team, low, high) in totals {
        let game = app.start_game(user, team, 18).await;
        app.save_hole(
            user,
            &game,
            1,
            json!({"player1": low, "player2": high, "player3": 12, "player4": 12}),
        )
        .await;
    }

    let (_, board) = app.call(Method::GET, "/leaderboard", None, None).await;
    let rows = board["rows"].as_array().unwrap();
    let names = rows.iter().map(|row| row["team_name"].as_str().unwrap()).collect::<Vec<_>>();
    let ranks = rows.iter().map(|row| row["rank"].as_u64().unwrap()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Nine", "Fifteen", "TwentyTwo"]);
    assert_eq!(ranks, vec![1, 2, 3]);
    assert_eq!(rows[0]["total_display"], "+9");
}

#[tokio::test]
async fn saving_the_last_hole_completes_the_game() {
    let app = TestApp::new().await;
    let game = app.start_game("keeper-1", "Eagles", 9).await;

    for hole in 1..=9 {
        let (status, _) = app
            .save_hole("keeper-1", &game, hole, json!({"player1": 4, "player2": 4}))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, card) = app
        .call(Method::GET, &format!("/games/{game}"), None, None)
        .await;
    assert_eq!(card["game"]["active"], false);
    assert_eq!(card["through"], 9);
    assert_eq!(card["through_display"], "F");
    assert_eq!(card["team_total"], 72);

    let (status, _) = app
        .save_hole("keeper-1", &game, 3, json!({"player1": 3}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, live) = app.call(Method::GET, "/leaderboard?scope=active", None, None).await;
    assert!(live["rows"].as_array().unwrap().is_empty());
    let (_, all) = app.call(Method::GET, "/leaderboard?scope=all", None, None).await;
    assert_eq!(all["rows"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn correcting_an_earlier_hole_keeps_the_pointer() {
    let app = TestApp::new().await;
    let game = app.start_game("keeper-1", "Eagles", 18).await;

    app.save_hole("keeper-1", &game, 1, json!({"player1": 5, "player2": 5}))
        .await;
    app.save_hole("keeper-1", &game, 2, json!({"player1": 4, "player2": 4}))
        .await;
    let (_, card) = app
        .save_hole("keeper-1", &game, 1, json!({"player1": 3}))
        .await;

    assert_eq!(card["game"]["current_hole"], 3);
    assert_eq!(card["hole_aggregates"][0], 8);
    assert_eq!(card["team_total"], 16);
}

#[tokio::test]
async fn finishing_early_keeps_pointer_and_completes() {
    let app = TestApp::new().await;
    let game = app.start_game("keeper-1", "Eagles", 18).await;
    app.save_hole("keeper-1", &game, 1, json!({"player1": 4, "player2": 5}))
        .await;

    let (status, card) = app
        .call(Method::POST, &format!("/games/{game}/finish"), Some("keeper-1"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["game"]["active"], false);
    assert_eq!(card["game"]["current_hole"], 2);
    assert_eq!(card["through"], 1);

    let (status, _) = app
        .call(Method::POST, &format!("/games/{game}/finish"), Some("keeper-1"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn roles_and_ownership_are_enforced() {
    let app = TestApp::new().await;

    let (status, _) = app
        .call(Method::POST, "/games", None, Some(json!({"holes": 9})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    app.register("fan-1", "Fan", "spectator").await;
    let (status, _) = app
        .call(
            Method::POST,
            "/teams",
            Some("fan-1"),
            Some(json!({"name": "Fans", "teammates": ["a", "b", "c"]})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let game = app.start_game("keeper-1", "Eagles", 9).await;
    app.start_game("keeper-2", "Hawks", 9).await;
    let (status, _) = app
        .save_hole("keeper-2", &game, 1, json!({"player1": 4}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn team_registration_rules() {
    let app = TestApp::new().await;
    app.start_game("keeper-1", "Eagles", 9).await;

    app.register("keeper-2", "Other Keeper", "scorekeeper").await;
    let (status, _) = app
        .call(
            Method::POST,
            "/teams",
            Some("keeper-2"),
            Some(json!({"name": "Eagles", "teammates": ["a", "b", "c"]})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .call(
            Method::POST,
            "/teams",
            Some("keeper-2"),
            Some(json!({"name": "Hawks", "teammates": ["a", "b"]})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(
            Method::POST,
            "/teams",
            Some("keeper-1"),
            Some(json!({"name": "Second", "teammates": ["a", "b", "c"]})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, mine) = app.call(Method::GET, "/teams/mine", Some("keeper-1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["players"][0]["id"], "player1");
    assert_eq!(mine["players"][0]["name"], "Eagles Keeper");
}

#[tokio::test]
async fn game_length_and_hole_range_are_validated() {
    let app = TestApp::new().await;
    let game = app.start_game("keeper-1", "Eagles", 9).await;

    let (_, summary) = app
        .call(Method::GET, &format!("/games/{game}"), None, None)
        .await;
    assert_eq!(summary["game"]["name"], "New 9-Hole Game");

    let (status, _) = app
        .call(Method::POST, "/games", Some("keeper-1"), Some(json!({"holes": 12})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .save_hole("keeper-1", &game, 10, json!({"player1": 4}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_requires_a_profile_and_keeps_order() {
    let app = TestApp::new().await;

    let (status, _) = app
        .call(Method::POST, "/chat/messages", Some("ghost"), Some(json!({"text": "hi"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.register("fan-1", "Fan One", "spectator").await;
    for text in ["first", "  second  "] {
        let (status, _) = app
            .call(Method::POST, "/chat/messages", Some("fan-1"), Some(json!({"text": text})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = app
        .call(Method::POST, "/chat/messages", Some("fan-1"), Some(json!({"text": "   "})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .call(Method::POST, "/chat/messages", Some("fan-1"), Some(json!({"text": ""})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, messages) = app.call(Method::GET, "/chat/messages", None, None).await;
    let texts = messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(texts, vec!["first", "second"]);
    assert_eq!(messages[0]["role"], "spectator");
    assert_eq!(messages[0]["display_name"], "Fan One");

    let (_, latest) = app.call(Method::GET, "/chat/messages?limit=1", None, None).await;
    assert_eq!(latest[0]["text"], "second");

    let (status, none) = app.call(Method::GET, "/chat/messages?limit=0", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn score_changes_are_broadcast() {
    let app = TestApp::new().await;
    let game = app.start_game("keeper-1", "Eagles", 9).await;
    let mut receiver = app.state.sse().subscribe();

    app.save_hole("keeper-1", &game, 1, json!({"player1": 4, "player2": 5}))
        .await;

    let mut names = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        names.push((event.event.unwrap_or_default(), event.game_id.is_some()));
    }
    assert!(names.contains(&("scores.updated".to_string(), true)));
    assert!(names.contains(&("leaderboard.updated".to_string(), false)));
}
