//! エラー監査ミドルウェア
//!
//! すべてのエラーレスポンスを1箇所で標準エンベロープに整形し、
//! ベストエフォートでERRORエントリをレジャーに記録する。
//! 記録の失敗はレスポンスに影響させない（warnログのみ）。

use crate::api::error::ErrorDetails;
use crate::audit::types::{AuditAction, AuditLogEntry};
use crate::db;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use notes_backend_common::{
    error::{NotesError, NotesResult},
    protocol::ErrorResponse,
    types::RequestContext,
};

/// ERRORエントリのエンティティ種別（特定エンティティに紐づかない）
const ERROR_ENTITY_TYPE: &str = "SYSTEM";

/// ERRORエントリのエンティティID
const ERROR_ENTITY_ID: &str = "-";

/// エラーレスポンスを整形・記録するミドルウェア
///
/// `request_context`より内側に配置する（extensionsからRequestContextを
/// 読むため）。エラーステータス以外のレスポンスには手を触れない。
pub async fn error_audit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let ctx = request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default();

    let response = next.run(request).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    // ハンドラ由来ならAppErrorが載せたErrorDetails、
    // フレームワーク拒否（ルート不一致等）ならステータスから合成
    let details = response
        .extensions()
        .get::<ErrorDetails>()
        .cloned()
        .unwrap_or_else(|| ErrorDetails::from_status(status));

    record_error(&state, &ctx, &details).await;

    let body = ErrorResponse {
        timestamp: Utc::now(),
        path,
        message: details.message,
        details: details.details,
        error_code: details.error_code.to_string(),
    };
    (status, Json(body)).into_response()
}

/// ERRORエントリをベストエフォートで追記する
async fn record_error(state: &AppState, ctx: &RequestContext, details: &ErrorDetails) {
    let entry = AuditLogEntry {
        error: Some(format!("{}: {}", details.error_code, details.details)),
        ..AuditLogEntry::new(
            &ctx.user_id,
            AuditAction::Error,
            ERROR_ENTITY_TYPE,
            ERROR_ENTITY_ID,
        )
    };

    let result: NotesResult<()> = async {
        let mut conn = state
            .db_pool
            .acquire()
            .await
            .map_err(|e| NotesError::Database(e.to_string()))?;
        db::audit_log::append(&mut conn, &entry).await
    }
    .await;

    if let Err(e) = result {
        tracing::warn!("Failed to record error audit entry: {}", e);
    }
}
