use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::authenticate;
use crate::error::ApiError;

/// Bearer-token authentication middleware.
///
/// Redeems the token with the introspection authority and injects the
/// resulting [`crate::auth::Identity`] into request extensions. Runs before
/// the handler (and its body extraction), so a rejected request never reaches
/// the store.
pub async fn introspection_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = authenticate(
        &headers,
        state.introspector.as_ref(),
        state.config.introspection.timeout(),
    )
    .await
    .map_err(|e| {
        tracing::debug!(method = %request.method(), uri = %request.uri(), "Rejected request: {}", e);
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
