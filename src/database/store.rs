use sqlx::SqlitePool;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Comment, Project};

/// Durable CRUD for projects and their comments.
///
/// Every mutating call commits before it returns. Identifiers are always
/// generated here (random v4) and never accepted from the caller on create.
#[derive(Clone)]
pub struct ResourceStore {
    pool: SqlitePool,
    slow_query_threshold: Option<Duration>,
}

impl ResourceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            slow_query_threshold: None,
        }
    }

    /// Log a warning for any operation slower than `threshold`
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    pub async fn count_projects(&self) -> Result<i64, DatabaseError> {
        let started = Instant::now();
        let count: (i64,) = sqlx::query_as("SELECT COUNT(project_id) FROM projects")
            .fetch_one(&self.pool)
            .await?;
        self.observe("count_projects", started);
        Ok(count.0)
    }

    pub async fn create_project(&self, project_name: &str) -> Result<Uuid, DatabaseError> {
        let started = Instant::now();
        let project_id = Uuid::new_v4();

        sqlx::query("INSERT INTO projects (project_id, project_name) VALUES (?, ?)")
            .bind(project_id.to_string())
            .bind(project_name)
            .execute(&self.pool)
            .await?;

        debug!(%project_id, "Created project");
        self.observe("create_project", started);
        Ok(project_id)
    }

    pub async fn get_project(&self, project_id: Uuid) -> Result<Project, DatabaseError> {
        let started = Instant::now();
        let project = sqlx::query_as::<_, Project>(
            "SELECT project_id, project_name FROM projects WHERE project_id = ?",
        )
        .bind(project_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        self.observe("get_project", started);

        project.ok_or_else(|| DatabaseError::NotFound(format!("Project {} not found", project_id)))
    }

    pub async fn get_project_name(&self, project_id: Uuid) -> Result<String, DatabaseError> {
        Ok(self.get_project(project_id).await?.project_name)
    }

    /// Remove a project and every comment on it. Both deletes share one
    /// transaction. Returns whether a project row was removed; a missing
    /// project is not an error.
    pub async fn delete_project(&self, project_id: Uuid) -> Result<bool, DatabaseError> {
        let started = Instant::now();
        let id = project_id.to_string();
        let mut tx = self.pool.begin().await?;

        let comments = sqlx::query("DELETE FROM comments WHERE project_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let projects = sqlx::query("DELETE FROM projects WHERE project_id = ?")
            .bind(&id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        debug!(%project_id, comments, projects, "Deleted project");
        self.observe("delete_project", started);
        Ok(projects > 0)
    }

    /// Comments for a project in insertion order
    pub async fn list_comments(&self, project_id: Uuid) -> Result<Vec<Comment>, DatabaseError> {
        let started = Instant::now();
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT comment_id, project_id, commenter_id, commenter_username, message
            FROM comments
            WHERE project_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(project_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        self.observe("list_comments", started);
        Ok(comments)
    }

    /// Insert a comment. The insert only happens while the project row
    /// exists, and the foreign key on `comments.project_id` refuses it as
    /// well; either way a missing project surfaces as `NotFound`.
    pub async fn add_comment(
        &self,
        project_id: Uuid,
        commenter_id: &str,
        commenter_username: &str,
        message: &str,
    ) -> Result<Uuid, DatabaseError> {
        let started = Instant::now();
        let comment_id = Uuid::new_v4();
        let id = project_id.to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO comments (comment_id, project_id, commenter_id, commenter_username, message)
            SELECT ?, ?, ?, ?, ?
            WHERE EXISTS (SELECT 1 FROM projects WHERE project_id = ?)
            "#,
        )
        .bind(comment_id.to_string())
        .bind(&id)
        .bind(commenter_id)
        .bind(commenter_username)
        .bind(message)
        .bind(&id)
        .execute(&self.pool)
        .await;

        let inserted = match result {
            Ok(done) => done.rows_affected(),
            Err(sqlx::Error::Database(db_err))
                if db_err.is_foreign_key_violation()
                    || db_err.message().contains("FOREIGN KEY constraint failed") =>
            {
                0
            }
            Err(e) => return Err(e.into()),
        };
        if inserted == 0 {
            return Err(DatabaseError::NotFound(format!("Project {} not found", project_id)));
        }

        debug!(%comment_id, %project_id, "Added comment");
        self.observe("add_comment", started);
        Ok(comment_id)
    }

    fn observe(&self, operation: &'static str, started: Instant) {
        if let Some(threshold) = self.slow_query_threshold {
            let elapsed = started.elapsed();
            if elapsed > threshold {
                warn!(operation, elapsed_ms = elapsed.as_millis() as u64, "Slow store operation");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_store;
    use std::collections::HashSet;

    #[tokio::test]
    async fn project_name_round_trips() {
        let store = memory_store().await;

        for name in [
            "Launch Plan",
            "",
            "it's a \"quoted\" name",
            "'); DROP TABLE projects; --",
            "100% _wild_ card\\s",
        ] {
            let id = store.create_project(name).await.unwrap();
            assert_eq!(store.get_project_name(id).await.unwrap(), name);
        }

        assert_eq!(store.count_projects().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let store = memory_store().await;

        let err = store.get_project_name(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
        assert!(matches!(
            store.get_project(Uuid::new_v4()).await,
            Err(DatabaseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn created_ids_are_v4() {
        let store = memory_store().await;
        let id = store.create_project("versioned").await.unwrap();

        assert_eq!(id.get_version_num(), 4);
        assert_eq!(id.get_variant(), uuid::Variant::RFC4122);
    }

    #[tokio::test]
    async fn delete_cascades_to_comments() {
        let store = memory_store().await;
        let pid = store.create_project("doomed").await.unwrap();
        let other = store.create_project("survivor").await.unwrap();

        store.add_comment(pid, "u-1", "ada", "first").await.unwrap();
        store.add_comment(pid, "u-2", "bob", "second").await.unwrap();
        store.add_comment(other, "u-1", "ada", "keep me").await.unwrap();

        assert!(store.delete_project(pid).await.unwrap());

        assert!(store.list_comments(pid).await.unwrap().is_empty());
        assert!(matches!(
            store.get_project_name(pid).await,
            Err(DatabaseError::NotFound(_))
        ));
        assert_eq!(store.list_comments(other).await.unwrap().len(), 1);

        let orphans: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments WHERE project_id = ?")
            .bind(pid.to_string())
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(orphans.0, 0);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = memory_store().await;
        let pid = store.create_project("twice").await.unwrap();

        assert!(store.delete_project(pid).await.unwrap());
        assert!(!store.delete_project(pid).await.unwrap());
        assert!(!store.delete_project(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn comments_come_back_in_insertion_order() {
        let store = memory_store().await;
        let pid = store.create_project("ordered").await.unwrap();

        let mut ids = Vec::new();
        for message in ["one", "two", "three", ""] {
            ids.push(store.add_comment(pid, "u-1", "", message).await.unwrap());
        }

        let comments = store.list_comments(pid).await.unwrap();
        assert_eq!(comments.iter().map(|c| c.comment_id).collect::<Vec<_>>(), ids);
        assert_eq!(comments[3].message, "");
        assert_eq!(comments[3].commenter_username, "");
        assert!(comments.iter().all(|c| c.project_id == pid));
    }

    #[tokio::test]
    async fn comment_text_is_stored_verbatim() {
        let store = memory_store().await;
        let pid = store.create_project("quotes").await.unwrap();
        let message = "Robert'); DELETE FROM comments; --";

        store.add_comment(pid, "u'1", "o'brien", message).await.unwrap();

        let comments = store.list_comments(pid).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].commenter_id, "u'1");
        assert_eq!(comments[0].commenter_username, "o'brien");
        assert_eq!(comments[0].message, message);
    }

    #[tokio::test]
    async fn comment_on_missing_project_is_rejected() {
        let store = memory_store().await;

        let err = store
            .add_comment(Uuid::new_v4(), "u-1", "ada", "hello?")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[tokio::test]
    async fn comment_on_missing_project_is_rejected_without_foreign_key() {
        let pool = DatabaseManager::in_memory().await.unwrap();
        sqlx::query(
            "CREATE TABLE comments (comment_id TEXT PRIMARY KEY, project_id TEXT, commenter_id TEXT, commenter_username TEXT, message TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();
        crate::database::initialize_schema(&pool).await.unwrap();
        let store = ResourceStore::new(pool);

        let err = store
            .add_comment(Uuid::new_v4(), "u-1", "ada", "orphan?")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));

        let pid = store.create_project("legacy").await.unwrap();
        store.add_comment(pid, "u-1", "ada", "fine").await.unwrap();
        assert!(store.delete_project(pid).await.unwrap());
        assert!(store.list_comments(pid).await.unwrap().is_empty());

        let rows: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(rows.0, 0);
    }

    #[tokio::test]
    async fn ten_thousand_ids_are_distinct() {
        let store = memory_store().await;
        let mut seen = HashSet::new();

        for i in 0..10_000 {
            let id = store.create_project(&format!("p{}", i)).await.unwrap();
            assert!(seen.insert(id), "duplicate id {}", id);
        }

        assert_eq!(store.count_projects().await.unwrap(), 10_000);
    }

    #[tokio::test]
    async fn count_tracks_creates_and_deletes() {
        let store = memory_store().await;
        let mut live = Vec::new();
        let mut expected = 0i64;

        for step in 0..40 {
            if step % 3 == 2 {
                let victim: Uuid = live.remove(0);
                assert!(store.delete_project(victim).await.unwrap());
                expected -= 1;
            } else {
                live.push(store.create_project("counted").await.unwrap());
                expected += 1;
            }
            assert_eq!(store.count_projects().await.unwrap(), expected);
        }
    }
}
