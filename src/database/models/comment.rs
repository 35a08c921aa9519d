use serde::Serialize;
use sqlx::{sqlite::SqliteRow, FromRow};
use uuid::Uuid;

use super::{text_column, uuid_column};

/// A comment as stored. `commenter_username` is captured when the comment is
/// posted and never re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub comment_id: Uuid,
    #[serde(skip_serializing)]
    pub project_id: Uuid,
    pub commenter_id: String,
    pub commenter_username: String,
    pub message: String,
}

impl<'r> FromRow<'r, SqliteRow> for Comment {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            comment_id: uuid_column(row, "comment_id")?,
            project_id: uuid_column(row, "project_id")?,
            commenter_id: text_column(row, "commenter_id")?,
            commenter_username: text_column(row, "commenter_username")?,
            message: text_column(row, "message")?,
        })
    }
}
