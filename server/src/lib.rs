//! Notes Backend Server
//!
//! 監査証跡（GxPスタイル）とRBACスタブ付きノート管理API

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// 監査ログシステム（追記専用レジャー + エラーインターセプター）
pub mod audit;

/// 認可・リクエストコンテキスト
pub mod auth;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// データベースアクセス
pub mod db;

/// ノートサービス（CRUDオーケストレーション）
pub mod notes;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// データベース接続プール
    pub db_pool: sqlx::SqlitePool,
    /// サーバー設定
    pub config: config::ServerConfig,
    /// ノートサービス
    pub notes: notes::NoteService,
}

impl AppState {
    /// アプリケーション状態を初期化
    pub fn new(db_pool: sqlx::SqlitePool, config: config::ServerConfig) -> Self {
        let notes = notes::NoteService::new(db_pool.clone());
        Self {
            db_pool,
            config,
            notes,
        }
    }
}
