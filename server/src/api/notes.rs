//! ノートAPIハンドラ
//!
//! 薄いHTTP境界層。入力の取り出しとレスポンス整形のみを行い、
//! 検証・認可・監査はすべて`NoteService`に委譲する。

use crate::api::error::ApiResult;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use notes_backend_common::{
    protocol::{NoteInput, NotePage},
    types::{Note, RequestContext},
};
use serde::Deserialize;
use uuid::Uuid;

/// `X-Signature`ヘッダー名
pub const SIGNATURE_HEADER: &str = "x-signature";

/// 一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// タイトル部分一致フィルタ（大文字小文字を区別しない）
    pub title: Option<String>,
    /// ページ番号（0始まり、デフォルト0）
    pub page: Option<i64>,
    /// ページあたり件数（デフォルト20）
    pub size: Option<i64>,
    /// ソート指定（`field`または`field,desc`）
    pub sort: Option<String>,
}

/// POST /api/v1/notes
pub async fn create_note(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Json(input): Json<NoteInput>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let note = state.notes.create(&ctx, input).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/v1/notes
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<NotePage>> {
    let page = state
        .notes
        .get_all(
            &ctx,
            query.title.as_deref(),
            query.page.unwrap_or(0),
            query.size.unwrap_or(20),
            query.sort.as_deref(),
        )
        .await?;
    Ok(Json(page))
}

/// GET /api/v1/notes/:id
pub async fn get_note(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Note>> {
    let note = state.notes.get_by_id(&ctx, id).await?;
    Ok(Json(note))
}

/// PUT /api/v1/notes/:id
pub async fn update_note(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
    Json(input): Json<NoteInput>,
) -> ApiResult<Json<Note>> {
    let note = state.notes.update(&ctx, id, input).await?;
    Ok(Json(note))
}

/// DELETE /api/v1/notes/:id
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    state
        .notes
        .delete(
            &ctx,
            id,
            signature,
            state.config.require_signature_on_delete,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
