#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use clap::Parser;
use http_body_util::BodyExt;
use proposal_pilot::domain::ports::CredentialSource;
use proposal_pilot::{
    create_app, AppState, GenerationGateway, MemoryStore, OpenAiProvider, ServerConfig,
    TokenIssuer,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "integration-test-secret";

/// 測試用固定憑證，不讀取環境變數
pub struct FixedKey(pub Option<&'static str>);

impl CredentialSource for FixedKey {
    fn api_key(&self) -> Option<String> {
        self.0.map(str::to_string)
    }
}

pub fn test_config() -> ServerConfig {
    ServerConfig::parse_from(["proposal-pilot", "--jwt-secret", JWT_SECRET])
}

pub fn build_app(provider_url: &str, key: Option<&'static str>) -> Router {
    let provider =
        OpenAiProvider::new(provider_url, "gpt-test", Duration::from_secs(5)).unwrap();
    let gateway = GenerationGateway::new(Arc::new(provider), Arc::new(FixedKey(key)));
    let state = AppState::with_store(
        Arc::new(MemoryStore::new()),
        TokenIssuer::new(JWT_SECRET, 30),
        gateway,
    );
    create_app(state, &test_config())
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let raw = body.map(|body| (body.to_string(), "application/json"));
    send_raw(app, method, uri, token, raw).await
}

/// 以原始字串送出請求，可指定任意 Content-Type
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<(String, &str)>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some((body, content_type)) => builder
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// 註冊帳號並回傳 token
pub async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "Jordan", "email": email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}
