pub mod comment;
pub mod project;

pub use comment::Comment;
pub use project::Project;

use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

/// Identifiers are stored as canonical hyphenated text; decode them back into `Uuid`.
pub(crate) fn uuid_column(row: &SqliteRow, column: &str) -> Result<Uuid, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    Uuid::parse_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Text columns written by older schemas may be NULL.
pub(crate) fn text_column(row: &SqliteRow, column: &str) -> Result<String, sqlx::Error> {
    let value: Option<String> = row.try_get(column)?;
    Ok(value.unwrap_or_default())
}
