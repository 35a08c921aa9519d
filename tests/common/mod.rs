#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use projects_api::auth::{AuthError, IntrospectionResponse, TokenIntrospector};
use projects_api::config::AppConfig;
use projects_api::database::{initialize_schema, DatabaseManager, ResourceStore};
use projects_api::{router, AppState};

pub const ADA_TOKEN: &str = "ada-token";
pub const BOB_TOKEN: &str = "bob-token";
pub const INACTIVE_TOKEN: &str = "expired-token";
pub const UNAVAILABLE_TOKEN: &str = "authority-down";

/// Introspection authority with a fixed set of known tokens
#[derive(Default)]
pub struct StubIntrospector {
    pub calls: AtomicUsize,
}

#[async_trait]
impl TokenIntrospector for StubIntrospector {
    async fn introspect(&self, token: &str) -> Result<IntrospectionResponse, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match token {
            ADA_TOKEN => Ok(IntrospectionResponse::active("user-ada", "ada")),
            BOB_TOKEN => Ok(IntrospectionResponse::active("user-bob", "bob")),
            UNAVAILABLE_TOKEN => Err(AuthError::AuthorityUnavailable("connection refused".to_string())),
            _ => Ok(IntrospectionResponse::inactive()),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: ResourceStore,
    pub introspector: Arc<StubIntrospector>,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        let pool = DatabaseManager::in_memory().await?;
        initialize_schema(&pool).await?;
        let store = ResourceStore::new(pool);

        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;

        let introspector = Arc::new(StubIntrospector::default());
        let state = AppState::new(store.clone(), introspector.clone(), config);

        Ok(Self {
            router: router(state),
            store,
            introspector,
        })
    }

    /// Send a request through the full router and decode the JSON reply
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, json))
    }

    pub async fn as_ada(&self, method: Method, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        self.send(method, uri, Some(&format!("Bearer {}", ADA_TOKEN)), body).await
    }

    pub async fn as_bob(&self, method: Method, uri: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        self.send(method, uri, Some(&format!("Bearer {}", BOB_TOKEN)), body).await
    }

    /// Create a project as ada and return its id
    pub async fn create_project(&self, name: &str) -> Result<String> {
        let (status, body) = self
            .as_ada(Method::POST, "/projects", Some(serde_json::json!({ "project_name": name })))
            .await?;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        Ok(body["project_id"].as_str().unwrap_or_default().to_string())
    }

    pub async fn comment_rows(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments")
            .fetch_one(self.store.pool())
            .await?;
        Ok(count.0)
    }
}
