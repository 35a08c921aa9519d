use crate::database::{initialize_schema, DatabaseManager, ResourceStore};

/// Fresh in-memory store with the schema in place
pub async fn memory_store() -> ResourceStore {
    let pool = DatabaseManager::in_memory()
        .await
        .expect("failed to open in-memory database");
    initialize_schema(&pool)
        .await
        .expect("failed to create schema");
    ResourceStore::new(pool)
}
