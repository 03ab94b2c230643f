//! ノートサービス
//!
//! CRUDオーケストレーション層。各ミューテーションは
//! ロール検査 → 入力検証 → 永続化 + 監査エントリ追記（同一トランザクション）
//! の短い直線的な処理として実行する。

use crate::audit::types::{to_json_safe, AuditAction, AuditLogEntry};
use crate::auth;
use crate::db;
use crate::db::notes::NoteSort;
use chrono::Utc;
use notes_backend_common::{
    error::{NotesError, NotesResult},
    protocol::{NoteInput, NotePage},
    types::{Note, RequestContext, UserRole, CONTENT_MAX_CHARS, TITLE_MAX_CHARS},
};
use sqlx::SqlitePool;
use uuid::Uuid;

/// 監査レジャー上のエンティティ種別
const ENTITY_TYPE: &str = "Note";

/// 削除エントリに記録する理由
const DELETE_REASON: &str = "User requested delete";

fn validate_input(input: &NoteInput) -> NotesResult<()> {
    if input.title.trim().is_empty() {
        return Err(NotesError::Validation(
            "title must not be blank".to_string(),
        ));
    }
    if input.title.chars().count() > TITLE_MAX_CHARS {
        return Err(NotesError::Validation(format!(
            "title length must be between 1 and {}",
            TITLE_MAX_CHARS
        )));
    }
    if input.content.chars().count() > CONTENT_MAX_CHARS {
        return Err(NotesError::Validation(format!(
            "content length must be <= {}",
            CONTENT_MAX_CHARS
        )));
    }
    Ok(())
}

/// ノートサービス
#[derive(Clone)]
pub struct NoteService {
    db_pool: SqlitePool,
}

impl NoteService {
    /// 新しいサービスを作成
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    /// ノートを作成する（要USER以上）
    ///
    /// id・タイムスタンプ・作成者はサーバー側で採番し、クライアント入力は
    /// title/contentのみ反映する。作成とCREATEエントリは同一トランザクション。
    pub async fn create(&self, ctx: &RequestContext, input: NoteInput) -> NotesResult<Note> {
        auth::require_role(ctx, UserRole::User)?;
        validate_input(&input)?;

        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            title: input.title,
            content: input.content,
            created_at: now,
            updated_at: now,
            created_by: ctx.user_id.clone(),
            updated_by: ctx.user_id.clone(),
        };

        let mut tx = self
            .db_pool
            .begin()
            .await
            .map_err(|e| NotesError::Transaction(e.to_string()))?;

        db::notes::insert(&mut tx, &note).await?;

        let entry = AuditLogEntry {
            after_state: Some(to_json_safe(&note)),
            ..AuditLogEntry::new(
                &ctx.user_id,
                AuditAction::Create,
                ENTITY_TYPE,
                note.id.to_string(),
            )
        };
        db::audit_log::append(&mut tx, &entry).await?;

        tx.commit()
            .await
            .map_err(|e| NotesError::Transaction(e.to_string()))?;

        tracing::info!(note_id = %note.id, user = %ctx.user_id, "note created");
        Ok(note)
    }

    /// ノートを1件取得する（要USER以上、監査エントリなし）
    pub async fn get_by_id(&self, ctx: &RequestContext, id: Uuid) -> NotesResult<Note> {
        auth::require_role(ctx, UserRole::User)?;
        db::notes::find_by_id(&self.db_pool, id)
            .await?
            .ok_or_else(|| NotesError::NotFound(format!("Note not found: {}", id)))
    }

    /// ノートを一覧する（要USER以上、監査エントリなし）
    pub async fn get_all(
        &self,
        ctx: &RequestContext,
        title: Option<&str>,
        page: i64,
        size: i64,
        sort: Option<&str>,
    ) -> NotesResult<NotePage> {
        auth::require_role(ctx, UserRole::User)?;

        if page < 0 {
            return Err(NotesError::Validation("page must be >= 0".to_string()));
        }
        if size < 1 {
            return Err(NotesError::Validation("size must be >= 1".to_string()));
        }
        if let Some(filter) = title {
            if filter.chars().count() > TITLE_MAX_CHARS {
                return Err(NotesError::Constraint(format!(
                    "title filter length must be <= {}",
                    TITLE_MAX_CHARS
                )));
            }
        }

        let sort = sort.map(NoteSort::parse).transpose()?.unwrap_or_default();
        // 空白のみのフィルタは無視する
        let filter = title.map(str::trim).filter(|t| !t.is_empty());

        let (notes, total_count) = db::notes::list(&self.db_pool, filter, page, size, &sort).await?;
        Ok(NotePage {
            notes,
            total_count,
            page,
            size,
        })
    }

    /// ノートを更新する（要USER以上）
    ///
    /// 変更前の状態をデタッチ済みスナップショットとして退避してから
    /// title/contentのみ適用する。id/created_at/created_byは不変。
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: NoteInput,
    ) -> NotesResult<Note> {
        auth::require_role(ctx, UserRole::User)?;
        validate_input(&input)?;

        let mut tx = self
            .db_pool
            .begin()
            .await
            .map_err(|e| NotesError::Transaction(e.to_string()))?;

        // スナップショットはミューテーションと同一トランザクション内で読む
        let existing = db::notes::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| NotesError::NotFound(format!("Note not found: {}", id)))?;
        let before = to_json_safe(&existing);

        let updated = Note {
            title: input.title,
            content: input.content,
            updated_at: Utc::now(),
            updated_by: ctx.user_id.clone(),
            ..existing
        };

        db::notes::update(&mut tx, &updated).await?;

        let entry = AuditLogEntry {
            before_state: Some(before),
            after_state: Some(to_json_safe(&updated)),
            ..AuditLogEntry::new(
                &ctx.user_id,
                AuditAction::Update,
                ENTITY_TYPE,
                id.to_string(),
            )
        };
        db::audit_log::append(&mut tx, &entry).await?;

        tx.commit()
            .await
            .map_err(|e| NotesError::Transaction(e.to_string()))?;

        tracing::info!(note_id = %id, user = %ctx.user_id, "note updated");
        Ok(updated)
    }

    /// ノートを削除する（要ADMIN）
    ///
    /// ロール検査は存在チェックより先に行う。署名必須フラグが有効な場合は
    /// `X-Signature`の存在のみ検査し、トークンはそのままレジャーに記録する。
    /// 行は物理削除され、以後の記録はレジャーのみが保持する。
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        signature: Option<&str>,
        require_signature: bool,
    ) -> NotesResult<()> {
        auth::require_role(ctx, UserRole::Admin)?;

        let mut tx = self
            .db_pool
            .begin()
            .await
            .map_err(|e| NotesError::Transaction(e.to_string()))?;

        let existing = db::notes::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| NotesError::NotFound(format!("Note not found: {}", id)))?;

        // 途中で失敗した場合はトランザクションごと破棄される
        if require_signature && signature.map_or(true, |s| s.trim().is_empty()) {
            return Err(NotesError::Validation(
                "Electronic signature required via X-Signature header".to_string(),
            ));
        }

        let before = to_json_safe(&existing);

        db::notes::delete(&mut tx, id).await?;

        let entry = AuditLogEntry {
            before_state: Some(before),
            reason: Some(DELETE_REASON.to_string()),
            signature: signature.map(str::to_string),
            ..AuditLogEntry::new(
                &ctx.user_id,
                AuditAction::Delete,
                ENTITY_TYPE,
                id.to_string(),
            )
        };
        db::audit_log::append(&mut tx, &entry).await?;

        tx.commit()
            .await
            .map_err(|e| NotesError::Transaction(e.to_string()))?;

        tracing::info!(note_id = %id, user = %ctx.user_id, "note deleted");
        Ok(())
    }
}
