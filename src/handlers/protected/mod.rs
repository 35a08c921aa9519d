// handlers/protected/mod.rs - Handlers behind the introspection middleware
//
// Every handler here can rely on an `Extension<Identity>` being present.

pub mod comments;
pub mod projects;
pub mod root;

pub use root::root_get;

use uuid::Uuid;

use crate::error::ApiError;

/// Path ids must be UUIDs; anything else could never match a row
pub(crate) fn parse_project_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::invalid_field("project_id", format!("Invalid UUID format: {}", raw)))
}
