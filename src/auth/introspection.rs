use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::AuthError;
use crate::config::IntrospectionConfig;

/// Claims returned for an active token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    pub user_id: String,
    pub username: String,
}

/// What the authority says about a token
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntrospectionResponse {
    pub active: bool,
    #[serde(default)]
    pub user_info: Option<UserInfo>,
}

impl IntrospectionResponse {
    pub fn active(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            active: true,
            user_info: Some(UserInfo {
                user_id: user_id.into(),
                username: username.into(),
            }),
        }
    }

    pub fn inactive() -> Self {
        Self {
            active: false,
            user_info: None,
        }
    }
}

/// External authority that redeems a raw bearer token for its claims
#[async_trait]
pub trait TokenIntrospector: Send + Sync {
    async fn introspect(&self, token: &str) -> Result<IntrospectionResponse, AuthError>;
}

/// Introspection over HTTP: `POST <url>` with form body `token=<raw>`,
/// optionally authenticated with the service's client credentials.
pub struct HttpIntrospector {
    client: reqwest::Client,
    url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl HttpIntrospector {
    pub fn new(config: &IntrospectionConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AuthError::AuthorityUnavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }
}

#[async_trait]
impl TokenIntrospector for HttpIntrospector {
    async fn introspect(&self, token: &str) -> Result<IntrospectionResponse, AuthError> {
        let mut request = self.client.post(&self.url).form(&[("token", token)]);
        if let Some(client_id) = &self.client_id {
            request = request.basic_auth(client_id, self.client_secret.as_deref());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::AuthorityUnavailable(e.to_string()))?;

        let status = response.status();
        debug!(%status, url = %self.url, "Introspection response");
        if !status.is_success() {
            return Err(AuthError::AuthorityUnavailable(format!(
                "introspection endpoint returned {}",
                status
            )));
        }

        response
            .json::<IntrospectionResponse>()
            .await
            .map_err(|e| AuthError::InvalidAuthorityResponse(e.to_string()))
    }
}
