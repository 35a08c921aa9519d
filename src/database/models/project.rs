use serde::Serialize;
use sqlx::{sqlite::SqliteRow, FromRow};
use uuid::Uuid;

use super::{text_column, uuid_column};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub project_id: Uuid,
    pub project_name: String,
}

impl<'r> FromRow<'r, SqliteRow> for Project {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            project_id: uuid_column(row, "project_id")?,
            project_name: text_column(row, "project_name")?,
        })
    }
}
