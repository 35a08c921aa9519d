pub mod auth;
pub mod response;

pub use auth::introspection_auth_middleware;
pub use response::{json_method_not_allowed, route_not_found, ApiResponse, ApiResult};
