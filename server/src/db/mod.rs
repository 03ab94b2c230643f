//! データベースアクセス層
//!
//! SQLiteデータベースへの接続とクエリ実行

/// 監査ログストレージ（追記専用）
pub mod audit_log;

/// ノートストレージ
pub mod notes;

use notes_backend_common::error::{NotesError, NotesResult};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// データベース接続プールを作成
///
/// マイグレーションも実行する。
pub async fn create_pool(database_url: &str) -> NotesResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|e| NotesError::Database(e.to_string()))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| NotesError::Database(format!("Migration failed: {}", e)))?;

    Ok(pool)
}
