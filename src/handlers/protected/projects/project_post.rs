// handlers/protected/projects/project_post.rs - POST /projects handler

use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};
use serde::Deserialize;

use super::ProjectResponse;
use crate::app::AppState;
use crate::auth::Identity;
use crate::database::Project;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateProjectRequest {
    /// Absent means empty
    pub project_name: String,
}

/// POST /projects - create a project and answer with its details
pub async fn project_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> ApiResult<ProjectResponse> {
    let Json(request) = payload?;

    let project_id = state.store.create_project(&request.project_name).await?;
    tracing::info!(%project_id, user_id = %identity.user_id, "Project created");

    let project = Project {
        project_id,
        project_name: request.project_name,
    };

    Ok(ApiResponse::created(ProjectResponse::new(project, identity, Vec::new())))
}
