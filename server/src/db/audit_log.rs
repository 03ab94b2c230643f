//! 監査ログストレージ
//!
//! audit_logsテーブルは追記専用。INSERTとSELECT以外の文は存在しない。
//! ミューテーションの記録は`append`を呼び出し側のトランザクション内で
//! 実行する（本体操作と監査行は両方永続化されるか、両方失敗するか）。

use crate::audit::types::{AuditAction, AuditLogEntry};
use chrono::{DateTime, Utc};
use notes_backend_common::error::{NotesError, NotesResult};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

fn db_error(e: sqlx::Error) -> NotesError {
    NotesError::Database(e.to_string())
}

fn map_row(row: &SqliteRow) -> NotesResult<AuditLogEntry> {
    let id_raw: String = row.try_get("id").map_err(db_error)?;
    let timestamp_raw: String = row.try_get("timestamp").map_err(db_error)?;
    let action_raw: String = row.try_get("action").map_err(db_error)?;

    Ok(AuditLogEntry {
        id: Uuid::parse_str(&id_raw)
            .map_err(|e| NotesError::Database(format!("Invalid audit id '{}': {}", id_raw, e)))?,
        timestamp: DateTime::parse_from_rfc3339(&timestamp_raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                NotesError::Database(format!("Invalid audit timestamp '{}': {}", timestamp_raw, e))
            })?,
        user_id: row.try_get("user_id").map_err(db_error)?,
        action: AuditAction::parse(&action_raw).ok_or_else(|| {
            NotesError::Database(format!("Unknown audit action '{}'", action_raw))
        })?,
        entity_type: row.try_get("entity_type").map_err(db_error)?,
        entity_id: row.try_get("entity_id").map_err(db_error)?,
        before_state: row.try_get("before_state").map_err(db_error)?,
        after_state: row.try_get("after_state").map_err(db_error)?,
        reason: row.try_get("reason").map_err(db_error)?,
        signature: row.try_get("signature").map_err(db_error)?,
        error: row.try_get("error").map_err(db_error)?,
    })
}

/// 監査エントリを追記する
pub async fn append(conn: &mut SqliteConnection, entry: &AuditLogEntry) -> NotesResult<()> {
    sqlx::query(
        "INSERT INTO audit_logs
         (id, timestamp, user_id, action, entity_type, entity_id,
          before_state, after_state, reason, signature, error)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(entry.id.to_string())
    .bind(entry.timestamp.to_rfc3339())
    .bind(&entry.user_id)
    .bind(entry.action.as_str())
    .bind(&entry.entity_type)
    .bind(&entry.entity_id)
    .bind(&entry.before_state)
    .bind(&entry.after_state)
    .bind(&entry.reason)
    .bind(&entry.signature)
    .bind(&entry.error)
    .execute(conn)
    .await
    .map_err(db_error)?;
    Ok(())
}

/// エンティティに紐づく監査エントリを時系列順に取得する
///
/// タイムスタンプの同値は挿入順（rowid）で決着する。
pub async fn list_for_entity(
    pool: &SqlitePool,
    entity_type: &str,
    entity_id: &str,
) -> NotesResult<Vec<AuditLogEntry>> {
    let rows = sqlx::query(
        "SELECT * FROM audit_logs
         WHERE entity_type = ? AND entity_id = ?
         ORDER BY timestamp ASC, rowid ASC",
    )
    .bind(entity_type)
    .bind(entity_id)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    rows.iter().map(map_row).collect()
}

/// 全監査エントリを時系列順に取得する
pub async fn list_all(pool: &SqlitePool) -> NotesResult<Vec<AuditLogEntry>> {
    let rows = sqlx::query("SELECT * FROM audit_logs ORDER BY timestamp ASC, rowid ASC")
        .fetch_all(pool)
        .await
        .map_err(db_error)?;

    rows.iter().map(map_row).collect()
}
