//! Bearer token verification against the identity provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

use super::{AuthUser, jwt::verify_jwt_token};
use crate::error::ApiError;

/// Turns a bearer token into the user it belongs to.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthUser, ApiError>;
}

/// Verifies HS256 tokens locally with the provider's signing secret.
#[derive(Clone)]
pub struct JwtVerifier {
    secret: String,
}

impl JwtVerifier {
    pub const fn new(secret: String) -> Self {
        Self { secret }
    }
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier").finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        let claims = verify_jwt_token(token, &self.secret)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Auth("Invalid user ID in token".to_string()))?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
        })
    }
}

/// Asks the identity provider's `/auth/v1/user` endpoint who owns the token.
#[derive(Debug, Clone)]
pub struct RemoteVerifier {
    user_url: String,
    api_key: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct RemoteUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
}

impl RemoteVerifier {
    pub fn new(base_url: &str, api_key: String) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            user_url: format!("{}/auth/v1/user", base_url.trim_end_matches('/')),
            api_key,
            client,
        })
    }
}

#[async_trait]
impl TokenVerifier for RemoteVerifier {
    async fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        let response = self
            .client
            .get(&self.user_url)
            .bearer_auth(token)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| ApiError::Internal(format!("Identity provider unreachable: {e}")))?;

        match response.status() {
            status if status.is_success() => {
                let user: RemoteUser = response.json().await.map_err(|e| {
                    ApiError::Internal(format!("Unexpected identity provider response: {e}"))
                })?;
                Ok(AuthUser {
                    user_id: user.id,
                    email: user.email,
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ApiError::Auth("Invalid or expired token".to_string()))
            }
            status => Err(ApiError::Internal(format!(
                "Identity provider returned {status}"
            ))),
        }
    }
}
