//! 監査ログの型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 監査対象のアクション種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// エンティティ作成
    Create,
    /// 読み取り（現設計では記録しない。レジャー肥大化を抑える意図的な割り切り）
    Read,
    /// エンティティ更新
    Update,
    /// エンティティ削除
    Delete,
    /// 未処理エラー
    Error,
}

impl AuditAction {
    /// アクションを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Error => "ERROR",
        }
    }

    /// 文字列からアクションに変換（DB行の復元用）
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATE" => Some(Self::Create),
            "READ" => Some(Self::Read),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 監査ログエントリ
///
/// 一度書かれたエントリは決して変更・削除されない（追記専用）。
/// `before_state`/`after_state`はシリアライズ済みのスナップショットであり、
/// 生きたエンティティへの参照ではないため、後続のミューテーションが
/// 履歴を書き換えることはない。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// レコードID
    pub id: Uuid,
    /// 記録時刻（UTC）
    pub timestamp: DateTime<Utc>,
    /// 操作したユーザーID（RequestContext由来）
    pub user_id: String,
    /// アクション種別
    pub action: AuditAction,
    /// エンティティ種別（例: "Note", "SYSTEM"）
    pub entity_type: String,
    /// エンティティID
    pub entity_id: String,
    /// 変更前スナップショット（JSON）
    pub before_state: Option<String>,
    /// 変更後スナップショット（JSON）
    pub after_state: Option<String>,
    /// 操作理由
    pub reason: Option<String>,
    /// 電子署名トークン（検証はしない。存在のみ記録）
    pub signature: Option<String>,
    /// エラー情報（action=ERRORのみ）
    pub error: Option<String>,
}

impl AuditLogEntry {
    /// 新しいエントリを作成（id採番・タイムスタンプ付与、他フィールドはNone）
    pub fn new(
        user_id: impl Into<String>,
        action: AuditAction,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_id: user_id.into(),
            action,
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            before_state: None,
            after_state: None,
            reason: None,
            signature: None,
            error: None,
        }
    }
}

/// エンティティをスナップショットJSONへシリアライズする
///
/// 失敗してもエラーを返さず、失敗を示すプレースホルダを記録する。
/// スナップショット化の失敗が監査行の喪失や本体操作の中断の原因に
/// なってはならない。
pub fn to_json_safe<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => format!(
            "{{\"_serializationError\":\"{}\"}}",
            e.to_string().replace('"', "'")
        ),
    }
}
