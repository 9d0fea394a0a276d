use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::IntoResponse,
    routing::get,
};
use opo_db::repositories::exam as exam_repo;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{ApiState, auth::AuthUser, error::ApiError};

const DEFAULT_QUESTION_LIMIT: i64 = 100;

/// Create the exam routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/exams", get(list_exams))
        .route("/exams/{exam_id}/questions", get(exam_questions))
}

#[derive(Debug, Deserialize, Validate)]
struct QuestionsQuery {
    #[validate(range(min = 1, max = 500, message = "limit must be between 1 and 500"))]
    limit: Option<i64>,
    #[serde(default)]
    shuffle: bool,
}

async fn list_exams(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let exams = exam_repo::list_all(&state.pool).await?;

    Ok(Json(json!({ "exams": exams })))
}

/// Question bank of an exam, in exam order unless `shuffle=true`
async fn exam_questions(
    _auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(exam_id): Path<i64>,
    query: Result<Query<QuestionsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::Validation(e.body_text()))?;
    query.validate()?;

    if !exam_repo::exists(&state.pool, exam_id).await? {
        return Err(ApiError::NotFound(format!("Exam {exam_id} not found")));
    }

    let questions = exam_repo::questions(
        &state.pool,
        exam_id,
        query.limit.unwrap_or(DEFAULT_QUESTION_LIMIT),
        query.shuffle,
    )
    .await?;

    Ok(Json(json!({
        "exam_id": exam_id,
        "questions": questions,
    })))
}
