// handlers/protected/root.rs - GET / handler

use axum::extract::{Extension, State};
use serde::Serialize;

use crate::app::AppState;
use crate::auth::Identity;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    pub message: String,
}

/// GET / - greet the caller with the current project count
pub async fn root_get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<GreetingResponse> {
    let count = state.store.count_projects().await?;

    Ok(ApiResponse::success(GreetingResponse {
        message: format!(
            "Hello {}, there are {} projects in the database!",
            identity.username, count
        ),
    }))
}
