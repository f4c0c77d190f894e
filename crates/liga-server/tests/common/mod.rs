#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use liga_core::LigaConfig;
use liga_server::{build_router, AppState};
use liga_store::LeagueStore;
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(LigaConfig::default())
    }

    pub fn with_config(config: LigaConfig) -> Self {
        let store = LeagueStore::open_in_memory().unwrap();
        let state = Arc::new(AppState::new(config, store));
        let router = build_router(Arc::clone(&state));
        Self { state, router }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let req = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body), None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body), None).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None, None).await
    }

    /// Create a row through the API and return its id.
    pub async fn create(&self, uri: &str, body: Value) -> i64 {
        let (status, json) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "POST {uri}: {json}");
        json["id"].as_i64().unwrap()
    }
}
