use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use opo_db::{models::TopicContent, repositories::topic as topic_repo};
use serde_json::json;

use crate::{ApiState, auth::AuthUser, error::ApiError};

/// Create the topic routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/topics", get(list_topics))
        .route("/topics/{topic_id}", get(get_topic))
}

/// List every topic, without content
async fn list_topics(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let topics = topic_repo::list_all(&state.pool).await?;

    Ok(Json(json!({ "topics": topics })))
}

/// Topic text and summary
async fn get_topic(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(topic_id): Path<i64>,
) -> Result<Json<TopicContent>, ApiError> {
    let topic = topic_repo::find_content(&state.pool, topic_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Topic {topic_id} not found")))?;

    Ok(Json(topic))
}
