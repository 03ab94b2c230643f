//! 統合テスト用ヘルパー
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use notes_backend_server::{api, config::ServerConfig, AppState};
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// 設定を指定してテスト用アプリを構築する
///
/// インメモリSQLiteは接続ごとに独立するため、接続数は1に固定する。
pub async fn test_app_with_config(config: ServerConfig) -> (Router, SqlitePool) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let state = AppState::new(pool.clone(), config);
    (api::create_router(state), pool)
}

/// デフォルト設定のテスト用アプリを構築する
pub async fn test_app() -> (Router, SqlitePool) {
    test_app_with_config(ServerConfig::default()).await
}

/// JSONボディ付きリクエストを作成する
pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// ボディなしリクエストを作成する
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// レスポンスボディをJSONとして読み取る
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&bytes).expect("Response body is not valid JSON")
}
