//! HTTP API層
//!
//! ルーティングとミドルウェアの組み立て

/// エラー変換
pub mod error;

/// ノートハンドラ
pub mod notes;

use crate::{audit, auth, AppState};
use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

/// APIルーターを作成
///
/// ミドルウェアは外側から順に TraceLayer → request_context → error_audit。
/// error_auditはRequestContextをextensionsから読むため、
/// request_contextより内側でなければならない。
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/notes",
            get(notes::list_notes).post(notes::create_note),
        )
        .route(
            "/api/v1/notes/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            audit::middleware::error_audit,
        ))
        .layer(middleware::from_fn(auth::middleware::request_context))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
