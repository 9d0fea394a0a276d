use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use uuid::Uuid;

use crate::{error::ApiError, metrics, state::ApiState};

/// Authenticated user extractor
///
/// Reads the `Authorization: Bearer <token>` header and resolves it through
/// the configured [`TokenVerifier`](super::TokenVerifier). Put it first in a
/// handler's arguments so unauthenticated requests are rejected before any
/// other work.
///
/// # Example
/// ```
/// use opo_api::{auth::AuthUser, error::ApiError};
///
/// async fn protected_route(auth_user: AuthUser) -> Result<String, ApiError> {
///     Ok(auth_user.user_id.to_string())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl<S> FromRequestParts<S> for AuthUser
where
    ApiState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Auth("Not authenticated".to_string()))?;

        let api_state = ApiState::from_ref(state);
        let verified = api_state.verifier.verify(bearer.token()).await;
        metrics::record_auth_event(verified.is_ok());
        let user = verified?;

        tracing::Span::current().record("user_id", tracing::field::display(user.user_id));

        Ok(user)
    }
}
