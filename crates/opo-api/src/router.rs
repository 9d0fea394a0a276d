use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;

use crate::{
    exam, middleware::request_id::RequestId, practice, question, state::ApiState, topic, tutor,
};

pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api_routes())
        .fallback(handler_404)
}

/// Application routes, mounted under `/api`
fn api_routes() -> Router<ApiState> {
    Router::new()
        .route("/", get(status))
        .merge(topic::routes())
        .merge(question::routes())
        .merge(tutor::routes())
        .merge(exam::routes())
        .merge(practice::routes())
}

async fn status() -> impl IntoResponse {
    Json(json!({ "status": "OpoQuiz API is up and running" }))
}

/// Liveness: the process is serving requests
async fn health() -> StatusCode {
    StatusCode::OK
}

/// Readiness: the database answers
async fn readiness(State(state): State<ApiState>) -> StatusCode {
    match opo_db::ping(&state.pool).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// JSON 404; the request id is echoed when the middleware ran
async fn handler_404(request_id: Option<Extension<RequestId>>) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "The requested resource was not found",
            "request_id": request_id.map(|Extension(id)| id.0),
        })),
    )
}
