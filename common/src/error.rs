//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `NotesError`は`error_code()`と`summary()`メソッドを提供し、
//! 標準エラーレスポンス（`protocol::ErrorResponse`）を生成できます。
//! HTTPステータスへの変換はサーバー層（`api::error`）で一元的に行います。

use thiserror::Error;

/// Notes backend error type
#[derive(Debug, Error)]
pub enum NotesError {
    /// Validation error (malformed or out-of-range input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Constraint violation on request parameters
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Insufficient role for the operation
    #[error("Insufficient role: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage-level integrity violation (e.g. duplicate key)
    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    /// Transaction begin/commit failure
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl NotesError {
    /// 安定したエラーコードを返す
    ///
    /// クライアントが分岐に使う値のため、変更してはならない。
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Constraint(_) => "CONSTRAINT_VIOLATION",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::DataIntegrity(_) => "DATA_INTEGRITY",
            Self::Transaction(_) => "TRANSACTION_ERROR",
            Self::Database(_) => "INTERNAL_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// エラーレスポンスの`message`フィールド用の概要文
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation error",
            Self::Constraint(_) => "Constraint violation",
            Self::Forbidden(_) => "Forbidden",
            Self::NotFound(_) => "Not found",
            Self::DataIntegrity(_) => "Data integrity violation",
            Self::Transaction(_) => "Transaction error",
            Self::Database(_) => "Internal server error",
            Self::Internal(_) => "Internal server error",
        }
    }
}

/// Result type alias
pub type NotesResult<T> = Result<T, NotesError>;
