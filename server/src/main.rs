//! Notes Backend Server Entry Point

use notes_backend_server::{api, config::ServerConfig, db, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Notes Backend v{}", env!("CARGO_PKG_VERSION"));

    // 設定読み込み（環境変数）
    let config = ServerConfig::from_env();

    tracing::info!("Connecting to database: {}", config.database_url);

    // データベース接続プールを作成（マイグレーション込み）
    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Database connected successfully");

    let bind_addr = format!("{}:{}", config.host, config.port);

    // アプリケーション状態を初期化
    let state = AppState::new(db_pool, config);

    // ルーター作成
    let app = api::create_router(state);

    // サーバー起動
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Notes Backend listening on {}", bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
