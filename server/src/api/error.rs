//! APIエラー変換
//!
//! `NotesError`をHTTPステータスへ一元的に対応付ける。レスポンスボディは
//! ここでは作らず、エラー内容を`ErrorDetails`としてレスポンスextensionsに
//! 載せる。最終的なエンベロープ生成と監査記録は
//! `audit::middleware::error_audit`が行う（リクエストパスはミドルウェア
//! 側でしか取れないため）。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use notes_backend_common::error::NotesError;

/// ハンドラの戻り値型
pub type ApiResult<T> = Result<T, AppError>;

/// エラーレスポンスの素材
///
/// `IntoResponse`実装がレスポンスextensionsに挿入し、error_audit
/// ミドルウェアが取り出してエンベロープと監査エントリを組み立てる。
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    /// 概要メッセージ
    pub message: String,
    /// 詳細情報
    pub details: String,
    /// 安定エラーコード
    pub error_code: &'static str,
}

impl ErrorDetails {
    /// ハンドラを経由しないエラー（ルート不一致、extractor拒否など）用に
    /// ステータスコードから合成する
    pub fn from_status(status: StatusCode) -> Self {
        let reason = status.canonical_reason().unwrap_or("Unknown error");
        let error_code = match status {
            StatusCode::FORBIDDEN => "FORBIDDEN",
            StatusCode::NOT_FOUND => "NOT_FOUND",
            s if s.is_client_error() => "VALIDATION_ERROR",
            _ => "INTERNAL_ERROR",
        };
        Self {
            message: reason.to_string(),
            details: reason.to_string(),
            error_code,
        }
    }
}

/// `NotesError`に対応するHTTPステータス
pub fn status_for(error: &NotesError) -> StatusCode {
    match error {
        NotesError::Validation(_) | NotesError::Constraint(_) | NotesError::Transaction(_) => {
            StatusCode::BAD_REQUEST
        }
        NotesError::Forbidden(_) => StatusCode::FORBIDDEN,
        NotesError::NotFound(_) => StatusCode::NOT_FOUND,
        NotesError::DataIntegrity(_) => StatusCode::CONFLICT,
        NotesError::Database(_) | NotesError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// ハンドラ用エラーラッパー
#[derive(Debug)]
pub struct AppError(pub NotesError);

impl From<NotesError> for AppError {
    fn from(error: NotesError) -> Self {
        Self(error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let details = ErrorDetails {
            message: self.0.summary().to_string(),
            details: self.0.to_string(),
            error_code: self.0.error_code(),
        };

        if status.is_server_error() {
            tracing::error!(code = details.error_code, "{}", details.details);
        } else {
            tracing::debug!(code = details.error_code, "{}", details.details);
        }

        let mut response = status.into_response();
        response.extensions_mut().insert(details);
        response
    }
}
