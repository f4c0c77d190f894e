mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::TestApp;
use futures_util::StreamExt;
use liga_core::LigaConfig;
use liga_live::Frame;
use serde_json::json;
use tower::ServiceExt;

fn event_data(frame: &Frame) -> serde_json::Value {
    match frame {
        Frame::Event { data, .. } => serde_json::from_str(data).unwrap(),
        other => panic!("expected an event, got {other:?}"),
    }
}

fn event_name(frame: &Frame) -> &str {
    match frame {
        Frame::Event { name, .. } => &**name,
        other => panic!("expected an event, got {other:?}"),
    }
}

#[tokio::test]
async fn stream_opens_with_preamble_and_unsubscribes_on_drop() {
    let app = TestApp::new();
    let resp = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/api/live").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "text/event-stream");
    assert_eq!(app.state.registry.count(), 1);

    let mut body = resp.into_body().into_data_stream();
    let first = body.next().await.unwrap().unwrap();
    assert_eq!(&first[..], b":ok\n\n");

    app.state.registry.sweep();
    let ping = body.next().await.unwrap().unwrap();
    assert_eq!(&ping[..], b":ping\n\n");

    drop(body);
    assert_eq!(app.state.registry.count(), 0);
}

#[tokio::test]
async fn subscribe_at_capacity_is_503() {
    let mut config = LigaConfig::default();
    config.live.max_clients = 0;
    let app = TestApp::with_config(config);

    let (status, body) = app.get("/api/live").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "CAPACITY");
    assert_eq!(app.state.registry.count(), 0);
}

#[tokio::test]
async fn subscribe_after_shutdown_is_refused() {
    let app = TestApp::new();
    let (_guard, mut rx) = app.state.registry.open_channel().unwrap();
    assert_eq!(app.state.registry.close_all(), 1);

    let (status, body) = app.get("/api/live").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "STREAM_CLOSED");
    assert_eq!(app.state.registry.count(), 0);

    assert_eq!(rx.recv().await.unwrap(), liga_live::frame::PREAMBLE);
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn status_reports_connected_clients() {
    let app = TestApp::new();
    let (_s1, _rx1) = app.state.registry.open_channel().unwrap();
    let (_s2, _rx2) = app.state.registry.open_channel().unwrap();

    let (status, body) = app.get("/api/live/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], true);
    assert_eq!(body["clients_connected"], 2);
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn stat_upsert_notifies_subscribers() {
    let app = TestApp::new();
    let t = app.create("/api/tournaments", json!({"name": "Apertura"})).await;
    let team = app.create("/api/teams", json!({"name": "Aguilas"})).await;
    let p = app
        .create("/api/players", json!({"equipo_id": team, "name": "Luis"}))
        .await;

    let subs: Vec<_> = (0..3)
        .map(|_| app.state.registry.open_channel().unwrap())
        .collect();

    let (status, record) = app
        .put(
            "/api/stats/ofensivas",
            json!({"jugador_id": p, "at_bats": 10, "hits": 4, "home_runs": 1}),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{record}");
    assert_eq!(record["torneo_id"], t);
    assert_eq!(record["rates"]["avg"], 0.4);

    for (_guard, mut rx) in subs {
        assert_eq!(rx.try_recv().unwrap(), liga_live::frame::PREAMBLE);
        let frame = rx.try_recv().unwrap();
        assert_eq!(event_name(&frame), "stats-update");
        let data = event_data(&frame);
        assert_eq!(data["tipo"], "ofensivas");
        assert_eq!(data["jugador_id"], p);
        assert_eq!(data["torneo_id"], t);
        assert!(data["timestamp"].as_str().is_some());
    }
}

#[tokio::test]
async fn activation_emits_tournament_change() {
    let app = TestApp::new();
    let first = app.create("/api/tournaments", json!({"name": "2025"})).await;
    let second = app.create("/api/tournaments", json!({"name": "2026"})).await;
    app.post(&format!("/api/tournaments/{first}/activate"), json!({}))
        .await;

    let (_guard, mut rx) = app.state.registry.open_channel().unwrap();
    rx.try_recv().unwrap();

    let (status, body) = app
        .post(&format!("/api/tournaments/{second}/activate"), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], true);

    let frame = rx.try_recv().unwrap();
    assert_eq!(event_name(&frame), "tournament-change");
    let data = event_data(&frame);
    assert_eq!(data["torneo_id"], second);
    assert_eq!(data["torneo_nombre"], "2026");
}

#[tokio::test]
async fn activating_missing_tournament_keeps_current_one() {
    let app = TestApp::new();
    let t = app.create("/api/tournaments", json!({"name": "2026"})).await;
    app.post(&format!("/api/tournaments/{t}/activate"), json!({}))
        .await;

    let (_guard, mut rx) = app.state.registry.open_channel().unwrap();
    rx.try_recv().unwrap();

    let (status, body) = app.post("/api/tournaments/999/activate", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(rx.try_recv().is_err(), "no event on failed activation");

    let (_, current) = app.get("/api/tournaments/current").await;
    assert_eq!(current["torneo_id"], t);
    assert_eq!(current["tournament"]["active"], true);
}

#[tokio::test]
async fn refresh_broadcasts_general_update() {
    let app = TestApp::new();
    let (_guard, mut rx) = app.state.registry.open_channel().unwrap();
    rx.try_recv().unwrap();

    let (status, body) = app
        .post("/api/live/refresh", json!({"message": "  tabla   lista "}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["delivered"], 1);

    let frame = rx.try_recv().unwrap();
    assert_eq!(event_name(&frame), "general-update");
    assert_eq!(event_data(&frame)["message"], "tabla lista");
}
