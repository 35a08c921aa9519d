// handlers/protected/projects/project_delete.rs - DELETE /projects/:project_id handler

use axum::extract::{Extension, Path, State};

use super::ProjectResponse;
use crate::app::AppState;
use crate::auth::Identity;
use crate::handlers::protected::parse_project_id;
use crate::middleware::{ApiResponse, ApiResult};

/// DELETE /projects/:project_id - remove a project and its comments,
/// answering with what was removed.
///
/// The snapshot is read before the delete. A comment added concurrently
/// between the two is still removed by the cascade but is missing from the
/// response.
pub async fn project_delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(project_id): Path<String>,
) -> ApiResult<ProjectResponse> {
    let project_id = parse_project_id(&project_id)?;

    let project = state.store.get_project(project_id).await?;
    let comments = state.store.list_comments(project_id).await?;

    state.store.delete_project(project_id).await?;
    tracing::info!(%project_id, user_id = %identity.user_id, comments = comments.len(), "Project deleted");

    Ok(ApiResponse::success(ProjectResponse::new(project, identity, comments)))
}
