use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use opo_db::repositories::topic as topic_repo;
use serde::Deserialize;

use super::{model::QuestionResponse, service};
use crate::{ApiState, auth::AuthUser, error::ApiError, middleware::rate_limit};

/// Create the question generation routes
pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    Router::new()
        .route("/get-question", get(get_question))
        .route("/get-random-question", get(get_random_question))
        .layer(make_rate_limit_layer!(
            rate_limit::GENERATION_RATE_PER_SECOND,
            rate_limit::GENERATION_BURST_SIZE
        ))
}

#[derive(Debug, Deserialize)]
struct QuestionQuery {
    topic_id: i64,
}

async fn get_question(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    query: Result<Query<QuestionQuery>, QueryRejection>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::Validation(e.body_text()))?;

    let question = service::question_for_topic(&state, auth_user.user_id, query.topic_id).await?;

    Ok(Json(question))
}

async fn get_random_question(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let topic_id = topic_repo::random_with_content(&state.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("No topics with content available".to_string()))?;

    tracing::debug!(topic_id, "Picked random topic");

    let question = service::question_for_topic(&state, auth_user.user_id, topic_id).await?;

    Ok(Json(question))
}
