use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::database::manager::DatabaseError;

struct SchemaObject {
    kind: &'static str,
    name: &'static str,
    ddl: &'static str,
}

// Order matters: comments references projects.
const SCHEMA: &[SchemaObject] = &[
    SchemaObject {
        kind: "table",
        name: "projects",
        ddl: r#"
            CREATE TABLE IF NOT EXISTS projects (
                project_id   TEXT PRIMARY KEY NOT NULL,
                project_name TEXT NOT NULL DEFAULT ''
            )
        "#,
    },
    SchemaObject {
        kind: "table",
        name: "comments",
        ddl: r#"
            CREATE TABLE IF NOT EXISTS comments (
                comment_id         TEXT PRIMARY KEY NOT NULL,
                project_id         TEXT NOT NULL
                                   REFERENCES projects(project_id) ON DELETE CASCADE,
                commenter_id       TEXT NOT NULL,
                commenter_username TEXT NOT NULL DEFAULT '',
                message            TEXT NOT NULL DEFAULT ''
            )
        "#,
    },
    SchemaObject {
        kind: "index",
        name: "comments_project_id_idx",
        ddl: "CREATE INDEX IF NOT EXISTS comments_project_id_idx ON comments (project_id)",
    },
];

/// Create whichever schema objects are missing and return their names.
///
/// Existing objects are detected through `sqlite_master` rather than by
/// swallowing errors, so any failure here is real and is returned to the
/// caller. The DDL itself is `IF NOT EXISTS`, so a second process creating
/// the same object between the check and the create is harmless.
pub async fn initialize_schema(pool: &SqlitePool) -> Result<Vec<&'static str>, DatabaseError> {
    let mut created = Vec::new();

    for object in SCHEMA {
        if object_exists(pool, object.kind, object.name)
            .await
            .map_err(|source| DatabaseError::Schema { object: object.name, source })?
        {
            debug!("Schema object {} already exists", object.name);
            continue;
        }

        sqlx::query(object.ddl)
            .execute(pool)
            .await
            .map_err(|source| DatabaseError::Schema { object: object.name, source })?;

        info!("Created {} {}", object.kind, object.name);
        created.push(object.name);
    }

    let linked = comments_reference_projects(pool)
        .await
        .map_err(|source| DatabaseError::Schema { object: "comments", source })?;
    if !linked {
        warn!("comments table has no foreign key to projects; cascade and orphan checks rely on the store");
    }

    Ok(created)
}

/// Whether `comments.project_id` carries a foreign key to `projects`.
/// Files created by older schemas may lack it.
pub async fn comments_reference_projects(pool: &SqlitePool) -> Result<bool, sqlx::Error> {
    let count: (i64,) = sqlx::query_as(
        r#"SELECT COUNT(*) FROM pragma_foreign_key_list('comments') WHERE "table" = 'projects'"#,
    )
    .fetch_one(pool)
    .await?;
    Ok(count.0 > 0)
}

async fn object_exists(pool: &SqlitePool, kind: &str, name: &str) -> Result<bool, sqlx::Error> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = ? AND name = ?")
        .bind(kind)
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(count.0 > 0)
}
