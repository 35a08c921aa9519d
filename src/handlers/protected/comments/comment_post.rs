// handlers/protected/comments/comment_post.rs - POST /projects/:project_id/comments handler

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::Identity;
use crate::database::Comment;
use crate::handlers::protected::parse_project_id;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateCommentRequest {
    /// Absent means empty
    pub message: String,
}

/// POST /projects/:project_id/comments - comment as the caller.
/// 404 when the project does not exist.
pub async fn comment_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(project_id): Path<String>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> ApiResult<Comment> {
    let project_id = parse_project_id(&project_id)?;
    let Json(request) = payload?;

    let comment_id = state
        .store
        .add_comment(project_id, &identity.user_id, &identity.username, &request.message)
        .await?;
    tracing::info!(%comment_id, %project_id, user_id = %identity.user_id, "Comment added");

    Ok(ApiResponse::created(Comment {
        comment_id,
        project_id,
        commenter_id: identity.user_id,
        commenter_username: identity.username,
        message: request.message,
    }))
}
