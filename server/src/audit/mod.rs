//! 監査ログシステム
//!
//! 全ミューテーションのbefore/afterスナップショットを追記専用レジャーに
//! 記録する。レジャーが履歴の正本であり、エンティティ削除後も記録は残る。

/// 監査ログの型定義
pub mod types;

/// 集中エラーインターセプター（エラーレスポンス整形 + ベストエフォートERROR記録）
pub mod middleware;
