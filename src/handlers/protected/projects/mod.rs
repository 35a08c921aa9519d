// handlers/protected/projects - /projects and /projects/:project_id

pub mod project_delete;
pub mod project_get;
pub mod project_post;

pub use project_delete::project_delete;
pub use project_get::project_get;
pub use project_post::project_post;

use serde::Serialize;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::{Comment, Project};

/// Project as returned by every /projects endpoint. The owner fields name the
/// authenticated caller of the request; no owner is stored with the project.
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub project_id: Uuid,
    pub owner_id: String,
    pub owner_username: String,
    pub project_name: String,
    pub comments: Vec<Comment>,
}

impl ProjectResponse {
    pub fn new(project: Project, owner: Identity, comments: Vec<Comment>) -> Self {
        Self {
            project_id: project.project_id,
            owner_id: owner.user_id,
            owner_username: owner.username,
            project_name: project.project_name,
            comments,
        }
    }
}
