//! リクエスト/レスポンスDTO
//!
//! HTTP境界で使うワイヤ型。フィールド名はすべてcamelCase

use crate::types::Note;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ノート作成・更新の入力
///
/// `id`や監査系フィールドは受け付けない（サーバー側で導出）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NoteInput {
    /// タイトル
    pub title: String,
    /// 本文（省略時は空文字列）
    #[serde(default)]
    pub content: String,
}

/// ノート一覧のページレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePage {
    /// ページ内のノート
    pub notes: Vec<Note>,
    /// フィルタ適用後の総件数
    pub total_count: i64,
    /// ページ番号（0始まり）
    pub page: i64,
    /// ページあたり件数
    pub size: i64,
}

/// 標準エラーレスポンス
///
/// `errorCode`は安定値: VALIDATION_ERROR, CONSTRAINT_VIOLATION, NOT_FOUND,
/// DATA_INTEGRITY, TRANSACTION_ERROR, FORBIDDEN, INTERNAL_ERROR
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// 発生時刻（ISO-8601）
    pub timestamp: DateTime<Utc>,
    /// リクエストパス
    pub path: String,
    /// 概要メッセージ
    pub message: String,
    /// 詳細情報
    pub details: String,
    /// 安定エラーコード
    pub error_code: String,
}
