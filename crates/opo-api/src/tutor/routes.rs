use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::prompt;
use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    metrics,
    middleware::rate_limit,
    topic::{self, TopicText},
    validation::require_text,
};

/// Create the tutor routes
pub fn routes() -> Router<ApiState> {
    use crate::make_rate_limit_layer;

    Router::new()
        .route("/ask-topic", post(ask_topic))
        .route("/explain-concept", post(explain_concept))
        .layer(make_rate_limit_layer!(
            rate_limit::TUTOR_RATE_PER_SECOND,
            rate_limit::TUTOR_BURST_SIZE
        ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct AskRequest {
    /// Answer from this topic's text
    pub topic_id: Option<i64>,
    /// Study text supplied by the client, used when no topic is given
    #[validate(length(max = 200_000, message = "Context is too long"))]
    pub context: Option<String>,
    #[validate(length(min = 1, max = 2000, message = "Query must be 1-2000 characters"))]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ExplainRequest {
    pub topic_id: i64,
    #[validate(length(min = 1, max = 500, message = "Concept must be 1-500 characters"))]
    pub concept: String,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub topic_id: i64,
    pub concept: String,
    pub explanation: String,
}

async fn ask_topic(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let query = require_text("query", &payload.query)?;

    let context = match (payload.topic_id, payload.context.as_deref()) {
        (Some(topic_id), _) => topic_text(&state, topic_id).await?.1,
        (None, Some(context)) => require_text("context", context)?.to_string(),
        (None, None) => {
            return Err(ApiError::Validation(
                "Either topic_id or context is required".to_string(),
            ));
        }
    };

    tracing::debug!(
        user_id = %auth_user.user_id,
        topic_id = ?payload.topic_id,
        "Answering tutor query"
    );

    let started = Instant::now();
    let generated = state
        .generator
        .generate(&prompt::ask_prompt(&context, query))
        .await;
    metrics::record_generation_event(
        "tutor",
        state.generator.name(),
        generated.is_ok(),
        started.elapsed(),
    );

    Ok(Json(AskResponse {
        answer: generated?.trim().to_string(),
    }))
}

async fn explain_concept(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    payload: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ExplainResponse>, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let concept = require_text("concept", &payload.concept)?.to_string();

    let (title, context) = topic_text(&state, payload.topic_id).await?;

    let started = Instant::now();
    let generated = state
        .generator
        .generate(&prompt::explain_prompt(&title, &context, &concept))
        .await;
    metrics::record_generation_event(
        "explanation",
        state.generator.name(),
        generated.is_ok(),
        started.elapsed(),
    );

    Ok(Json(ExplainResponse {
        topic_id: payload.topic_id,
        concept,
        explanation: generated?.trim().to_string(),
    }))
}

/// Title and text of a topic that has content.
async fn topic_text(state: &ApiState, topic_id: i64) -> Result<(String, String), ApiError> {
    let TopicText { topic, text } = topic::load_text(state, topic_id).await?;

    Ok((topic.title, text))
}
