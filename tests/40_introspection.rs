use anyhow::{Context, Result};
use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::post,
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use projects_api::auth::{AuthError, HttpIntrospector, TokenIntrospector, UserInfo};
use projects_api::config::IntrospectionConfig;

#[derive(Deserialize)]
struct IntrospectForm {
    token: String,
}

// "Basic " + base64("svc:secret")
const EXPECTED_BASIC: &str = "Basic c3ZjOnNlY3JldA==";

async fn introspect(headers: HeaderMap, Form(form): Form<IntrospectForm>) -> (StatusCode, Json<Value>) {
    let basic_ok = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == EXPECTED_BASIC)
        .unwrap_or(false);
    if !basic_ok {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad client" })));
    }

    match form.token.as_str() {
        "live" => (
            StatusCode::OK,
            Json(json!({
                "active": true,
                "scope": "projects",
                "user_info": { "user_id": "user-ada", "username": "ada" }
            })),
        ),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "boom" }))),
        "garbage" => (StatusCode::OK, Json(json!({ "unexpected": "shape" }))),
        _ => (StatusCode::OK, Json(json!({ "active": false }))),
    }
}

async fn spawn_authority() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let app = Router::new().route("/introspect", post(introspect));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://127.0.0.1:{}/introspect", port))
}

fn config(url: String) -> IntrospectionConfig {
    IntrospectionConfig {
        url,
        client_id: Some("svc".to_string()),
        client_secret: Some("secret".to_string()),
        timeout_ms: 2_000,
    }
}

#[tokio::test]
async fn active_token_returns_claims() -> Result<()> {
    let url = spawn_authority().await?;
    let client = HttpIntrospector::new(&config(url))?;

    let response = client.introspect("live").await?;

    assert!(response.active);
    assert_eq!(
        response.user_info,
        Some(UserInfo {
            user_id: "user-ada".to_string(),
            username: "ada".to_string()
        })
    );
    Ok(())
}

#[tokio::test]
async fn inactive_token_has_no_claims() -> Result<()> {
    let url = spawn_authority().await?;
    let client = HttpIntrospector::new(&config(url))?;

    let response = client.introspect("revoked").await?;

    assert!(!response.active);
    assert!(response.user_info.is_none());
    Ok(())
}

#[tokio::test]
async fn authority_errors_are_unavailable() -> Result<()> {
    let url = spawn_authority().await?;
    let client = HttpIntrospector::new(&config(url.clone()))?;
    assert!(matches!(
        client.introspect("boom").await,
        Err(AuthError::AuthorityUnavailable(_))
    ));

    let mut wrong_client = config(url);
    wrong_client.client_secret = Some("wrong".to_string());
    let client = HttpIntrospector::new(&wrong_client)?;
    assert!(matches!(
        client.introspect("live").await,
        Err(AuthError::AuthorityUnavailable(_))
    ));
    Ok(())
}

#[tokio::test]
async fn unexpected_body_is_invalid_response() -> Result<()> {
    let url = spawn_authority().await?;
    let client = HttpIntrospector::new(&config(url))?;

    assert!(matches!(
        client.introspect("garbage").await,
        Err(AuthError::InvalidAuthorityResponse(_))
    ));
    Ok(())
}

#[tokio::test]
async fn unreachable_authority_is_unavailable() -> Result<()> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let client = HttpIntrospector::new(&config(format!("http://127.0.0.1:{}/introspect", port)))?;

    assert!(matches!(
        client.introspect("live").await,
        Err(AuthError::AuthorityUnavailable(_))
    ));
    Ok(())
}
