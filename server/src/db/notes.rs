//! ノートストレージ
//!
//! notesテーブルへのCRUD。UUIDとタイムスタンプはTEXT（RFC3339）で保持する。
//! ミューテーション系は監査エントリと同一トランザクションで実行できるよう
//! `&mut SqliteConnection`を受け取る。

use chrono::{DateTime, Utc};
use notes_backend_common::{
    error::{NotesError, NotesResult},
    types::Note,
};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

/// ソート対象カラム
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// 作成日時
    CreatedAt,
    /// 更新日時
    UpdatedAt,
    /// タイトル
    Title,
}

impl SortField {
    /// SQL上のカラム名（ホワイトリスト。これ以外の文字列はSQLに混ざらない）
    fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
        }
    }
}

/// ソート指定
///
/// ワイヤ形式は`field`または`field,desc`（Spring風）。フィールドは
/// createdAt / updatedAt / title のみ許可する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteSort {
    /// ソートカラム
    pub field: SortField,
    /// 降順フラグ
    pub descending: bool,
}

impl NoteSort {
    /// ソート指定文字列を解析する
    pub fn parse(spec: &str) -> NotesResult<Self> {
        let mut parts = spec.splitn(2, ',');
        let field = match parts.next().unwrap_or("").trim() {
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            "title" => SortField::Title,
            other => {
                return Err(NotesError::Validation(format!(
                    "unknown sort field: {}",
                    other
                )))
            }
        };
        let descending = match parts.next().map(str::trim) {
            None | Some("asc") => false,
            Some("desc") => true,
            Some(other) => {
                return Err(NotesError::Validation(format!(
                    "unknown sort direction: {}",
                    other
                )))
            }
        };
        Ok(Self { field, descending })
    }

    fn order_clause(&self) -> String {
        format!(
            "{} {}",
            self.field.column(),
            if self.descending { "DESC" } else { "ASC" }
        )
    }
}

impl Default for NoteSort {
    /// デフォルトは作成日時の降順
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            descending: true,
        }
    }
}

fn db_error(e: sqlx::Error) -> NotesError {
    let message = e.to_string();
    if message.contains("UNIQUE constraint failed") {
        NotesError::DataIntegrity(message)
    } else {
        NotesError::Database(message)
    }
}

fn parse_timestamp(raw: &str) -> NotesResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| NotesError::Database(format!("Invalid timestamp '{}': {}", raw, e)))
}

fn map_row(row: &SqliteRow) -> NotesResult<Note> {
    let id_raw: String = row.try_get("id").map_err(db_error)?;
    let created_at_raw: String = row.try_get("created_at").map_err(db_error)?;
    let updated_at_raw: String = row.try_get("updated_at").map_err(db_error)?;

    Ok(Note {
        id: Uuid::parse_str(&id_raw)
            .map_err(|e| NotesError::Database(format!("Invalid note id '{}': {}", id_raw, e)))?,
        title: row.try_get("title").map_err(db_error)?,
        content: row.try_get("content").map_err(db_error)?,
        created_at: parse_timestamp(&created_at_raw)?,
        updated_at: parse_timestamp(&updated_at_raw)?,
        created_by: row.try_get("created_by").map_err(db_error)?,
        updated_by: row.try_get("updated_by").map_err(db_error)?,
    })
}

/// ノートを挿入する
pub async fn insert(conn: &mut SqliteConnection, note: &Note) -> NotesResult<()> {
    sqlx::query(
        "INSERT INTO notes (id, title, content, created_at, updated_at, created_by, updated_by)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(note.id.to_string())
    .bind(&note.title)
    .bind(&note.content)
    .bind(note.created_at.to_rfc3339())
    .bind(note.updated_at.to_rfc3339())
    .bind(&note.created_by)
    .bind(&note.updated_by)
    .execute(conn)
    .await
    .map_err(db_error)?;
    Ok(())
}

/// ノートを更新する
///
/// id/created_at/created_byは書き換え対象に含めない（不変フィールド）。
pub async fn update(conn: &mut SqliteConnection, note: &Note) -> NotesResult<()> {
    let result = sqlx::query(
        "UPDATE notes SET title = ?, content = ?, updated_at = ?, updated_by = ? WHERE id = ?",
    )
    .bind(&note.title)
    .bind(&note.content)
    .bind(note.updated_at.to_rfc3339())
    .bind(&note.updated_by)
    .bind(note.id.to_string())
    .execute(conn)
    .await
    .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(NotesError::NotFound(format!("Note not found: {}", note.id)));
    }
    Ok(())
}

/// ノートを削除する（トゥームストーンは残さない）
pub async fn delete(conn: &mut SqliteConnection, id: Uuid) -> NotesResult<()> {
    let result = sqlx::query("DELETE FROM notes WHERE id = ?")
        .bind(id.to_string())
        .execute(conn)
        .await
        .map_err(db_error)?;

    if result.rows_affected() == 0 {
        return Err(NotesError::NotFound(format!("Note not found: {}", id)));
    }
    Ok(())
}

/// IDでノートを検索する
///
/// プールとトランザクションの両方で実行できる。ミューテーション前の
/// スナップショット取得は本体操作と同一トランザクション内で行うこと
/// （プール側で読むと並行書き込みに対して古い状態を記録しうる）。
pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> NotesResult<Option<Note>>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let row = sqlx::query("SELECT * FROM notes WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(executor)
        .await
        .map_err(db_error)?;

    row.as_ref().map(map_row).transpose()
}

/// ノートを一覧する
///
/// タイトルの部分一致フィルタ（大文字小文字を区別しない）とページング、
/// ソート指定に対応。戻り値はページ内容とフィルタ適用後の総件数。
pub async fn list(
    pool: &SqlitePool,
    title_filter: Option<&str>,
    page: i64,
    size: i64,
    sort: &NoteSort,
) -> NotesResult<(Vec<Note>, i64)> {
    let order = sort.order_clause();
    // 極端なページ番号でオフセット計算が溢れないようにする
    let offset = page
        .checked_mul(size)
        .ok_or_else(|| NotesError::Validation("page is out of range".to_string()))?;

    let (rows, total) = match title_filter {
        Some(filter) => {
            let rows = sqlx::query(&format!(
                "SELECT * FROM notes
                 WHERE LOWER(title) LIKE '%' || LOWER(?) || '%'
                 ORDER BY {} LIMIT ? OFFSET ?",
                order
            ))
            .bind(filter)
            .bind(size)
            .bind(offset)
            .fetch_all(pool)
            .await
            .map_err(db_error)?;

            let total: (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM notes WHERE LOWER(title) LIKE '%' || LOWER(?) || '%'",
            )
            .bind(filter)
            .fetch_one(pool)
            .await
            .map_err(db_error)?;

            (rows, total.0)
        }
        None => {
            let rows = sqlx::query(&format!(
                "SELECT * FROM notes ORDER BY {} LIMIT ? OFFSET ?",
                order
            ))
            .bind(size)
            .bind(offset)
            .fetch_all(pool)
            .await
            .map_err(db_error)?;

            let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes")
                .fetch_one(pool)
                .await
                .map_err(db_error)?;

            (rows, total.0)
        }
    };

    let notes = rows.iter().map(map_row).collect::<NotesResult<Vec<_>>>()?;
    Ok((notes, total))
}
