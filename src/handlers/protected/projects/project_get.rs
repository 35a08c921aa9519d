// handlers/protected/projects/project_get.rs - GET /projects/:project_id handler

use axum::extract::{Extension, Path, State};

use super::ProjectResponse;
use crate::app::AppState;
use crate::auth::Identity;
use crate::handlers::protected::parse_project_id;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /projects/:project_id - project details plus its comments
pub async fn project_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(project_id): Path<String>,
) -> ApiResult<ProjectResponse> {
    let project_id = parse_project_id(&project_id)?;

    let project = state.store.get_project(project_id).await?;
    let comments = state.store.list_comments(project_id).await?;

    Ok(ApiResponse::success(ProjectResponse::new(project, identity, comments)))
}
