pub mod manager;
pub mod models;
pub mod schema;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use models::{Comment, Project};
pub use schema::initialize_schema;
pub use store::ResourceStore;
