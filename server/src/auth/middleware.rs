//! リクエストコンテキストミドルウェア
//!
//! 受信リクエストごとに`X-User-Id`/`X-Role`ヘッダーからRequestContextを
//! 1度だけ構築し、リクエストextensionsに挿入する。extensionsはリクエスト
//! スコープのため、成功・失敗を問わずレスポンス送出とともに破棄され、
//! ワーカー再利用時に識別情報が漏れることはない。

use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use notes_backend_common::types::{RequestContext, UserRole};

/// `X-User-Id`ヘッダー名
pub const USER_ID_HEADER: &str = "x-user-id";

/// `X-Role`ヘッダー名
pub const ROLE_HEADER: &str = "x-role";

/// ヘッダーからRequestContextを構築する
///
/// ヘッダー欠落・不正値はデフォルト（user_id="system", role=USER）に落とす。
pub fn context_from_headers(headers: &HeaderMap) -> RequestContext {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("system")
        .to_string();

    let role = headers
        .get(ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(UserRole::from_header)
        .unwrap_or(UserRole::User);

    RequestContext { user_id, role }
}

/// リクエストコンテキストを設定するミドルウェア
pub async fn request_context(mut request: Request, next: Next) -> Response {
    let ctx = context_from_headers(request.headers());
    request.extensions_mut().insert(ctx);
    next.run(request).await
}
