//! 共通型定義
//!
//! Note, UserRole, RequestContext等のコアデータ型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// タイトルの最大文字数
pub const TITLE_MAX_CHARS: usize = 200;

/// 本文の最大文字数
pub const CONTENT_MAX_CHARS: usize = 10_000;

/// ユーザーロール
///
/// 2段階のRBAC: ADMINはUSERの上位集合
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// 一般ユーザー（削除を除くCRUD操作）
    User,
    /// 管理者（全操作可能）
    Admin,
}

impl UserRole {
    /// `X-Role`ヘッダー値からロールを解決する
    ///
    /// 大文字小文字は区別しない。ADMIN以外はすべてUSER扱い
    /// （呼び出し側申告のスタブ信頼モデル）。
    pub fn from_header(value: &str) -> Self {
        if value.eq_ignore_ascii_case("ADMIN") {
            Self::Admin
        } else {
            Self::User
        }
    }

    /// ロールを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// リクエストスコープの識別情報
///
/// リクエスト受信時にヘッダーから1度だけ構築され、リクエスト終了とともに
/// 破棄される。プロセスグローバルには決して保持しない（並行リクエスト間の
/// 漏洩防止）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// ユーザーID（`X-User-Id`、デフォルト "system"）
    pub user_id: String,
    /// ロール（`X-Role`、デフォルト USER）
    pub role: UserRole,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            user_id: "system".to_string(),
            role: UserRole::User,
        }
    }
}

/// ノート
///
/// `created_by`/`updated_by`はクライアント入力からは決して設定されず、
/// 書き込み時点のRequestContextから導出される。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// 一意識別子（サーバー採番、不変）
    pub id: Uuid,
    /// タイトル（1..200文字、空白のみ不可）
    pub title: String,
    /// 本文（0..10000文字）
    pub content: String,
    /// 作成日時（UTC、不変）
    pub created_at: DateTime<Utc>,
    /// 最終更新日時（UTC）
    pub updated_at: DateTime<Utc>,
    /// 作成ユーザー（不変）
    pub created_by: String,
    /// 最終更新ユーザー
    pub updated_by: String,
}
