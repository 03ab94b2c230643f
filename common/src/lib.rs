//! Notes Backend 共通クレート
//!
//! サーバーとテストで共有する型定義・プロトコル・エラー型

#![warn(missing_docs)]

/// エラー型定義
pub mod error;

/// リクエスト/レスポンスDTO
pub mod protocol;

/// コアデータ型（Note, UserRole, RequestContext）
pub mod types;
