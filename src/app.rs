use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::TokenIntrospector;
use crate::config::{AppConfig, SecurityConfig};
use crate::database::ResourceStore;
use crate::handlers::{protected, public};
use crate::middleware::{introspection_auth_middleware, json_method_not_allowed, route_not_found};

/// Everything a request needs, built once at startup and cloned per request
#[derive(Clone)]
pub struct AppState {
    pub store: ResourceStore,
    pub introspector: Arc<dyn TokenIntrospector>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: ResourceStore, introspector: Arc<dyn TokenIntrospector>, config: AppConfig) -> Self {
        Self {
            store,
            introspector,
            config: Arc::new(config),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        // Public
        .merge(public_routes())
        // Protected (bearer token required)
        .merge(protected_routes(state.clone()))
        .fallback(route_not_found)
        // Global middleware
        .layer(middleware::map_response(json_method_not_allowed))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new().route("/health", get(public::health_get))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{comments, projects};

    Router::new()
        .route("/", get(protected::root_get))
        .route("/projects", post(projects::project_post))
        .route(
            "/projects/:project_id",
            get(projects::project_get).delete(projects::project_delete),
        )
        .route("/projects/:project_id/comments", post(comments::comment_post))
        .route_layer(middleware::from_fn_with_state(state, introspection_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}
