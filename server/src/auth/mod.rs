//! 認可・リクエストコンテキスト
//!
//! `X-User-Id`/`X-Role`ヘッダーによるスタブ信頼モデル。暗号学的な認証は
//! 意図的に行わない（設計上の非目標）。

pub mod middleware;

use notes_backend_common::{
    error::{NotesError, NotesResult},
    types::{RequestContext, UserRole},
};

/// 要求ロールを満たすか検査する
///
/// `ADMIN`は常に admit（上位集合）。拒否時は業務ロジック実行前に
/// `Forbidden`で即座に失敗し、副作用を一切残さない。
pub fn require_role(ctx: &RequestContext, required: UserRole) -> NotesResult<()> {
    if ctx.role == required || ctx.role == UserRole::Admin {
        Ok(())
    } else {
        Err(NotesError::Forbidden(format!(
            "{} role required",
            required
        )))
    }
}
