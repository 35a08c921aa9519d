pub mod introspection;

pub use introspection::{HttpIntrospector, IntrospectionResponse, TokenIntrospector, UserInfo};

use axum::http::{header::AUTHORIZATION, HeaderMap};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const BEARER_PREFIX: &str = "Bearer ";

/// The verified caller of a request. Derived per request from the
/// introspection response; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: String,
    pub username: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Malformed Authorization header: {0}")]
    MalformedHeader(&'static str),

    #[error("Token is not active")]
    InactiveToken,

    #[error("Token introspection unavailable: {0}")]
    AuthorityUnavailable(String),

    #[error("Invalid introspection response: {0}")]
    InvalidAuthorityResponse(String),
}

/// Pull the raw token out of `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::MalformedHeader("header is not valid ASCII"))?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader("expected Bearer scheme"))?;

    if token.trim().is_empty() {
        return Err(AuthError::MalformedHeader("empty bearer token"));
    }

    Ok(token)
}

/// Short, stable, non-reversible tag for a token, safe to put in logs
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{:x}", digest)[..12].to_string()
}

/// Turn request headers into a trusted identity.
///
/// Fails before any side effect when the header is missing or malformed, the
/// authority reports the token inactive, or the authority cannot be reached
/// within `timeout`.
pub async fn authenticate(
    headers: &HeaderMap,
    introspector: &dyn TokenIntrospector,
    timeout: Duration,
) -> Result<Identity, AuthError> {
    let token = extract_bearer_token(headers)?;
    let fingerprint = token_fingerprint(token);

    let response = match tokio::time::timeout(timeout, introspector.introspect(token)).await {
        Ok(result) => result?,
        Err(_) => {
            warn!(token = %fingerprint, ?timeout, "Token introspection timed out");
            return Err(AuthError::AuthorityUnavailable(format!(
                "introspection timed out after {}ms",
                timeout.as_millis()
            )));
        }
    };

    if !response.active {
        debug!(token = %fingerprint, "Token introspected as inactive");
        return Err(AuthError::InactiveToken);
    }

    let user_info = response.user_info.ok_or_else(|| {
        AuthError::InvalidAuthorityResponse("active token without user_info".to_string())
    })?;

    debug!(token = %fingerprint, user_id = %user_info.user_id, "Authenticated");
    Ok(Identity {
        user_id: user_info.user_id,
        username: user_info.username,
    })
}
