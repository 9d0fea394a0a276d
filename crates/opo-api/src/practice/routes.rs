use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use opo_db::{
    models::{ExamQuestion, NewAnswer, TestSession},
    repositories::{exam as exam_repo, session as session_repo, stats as stats_repo, topic as topic_repo},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    ApiState,
    auth::AuthUser,
    error::ApiError,
    validation::{normalize_answer, require_text},
};

/// Create the test session and stats routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/tests/start", post(start_test))
        .route("/tests/answer", post(record_answer))
        .route("/tests/{session_id}/finish", post(finish_test))
        .route("/stats", get(user_stats))
}

#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    pub topic_id: Option<i64>,
    pub exam_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnswerRequest {
    pub session_id: Uuid,
    #[validate(length(min = 1, max = 2000, message = "Question must be 1-2000 characters"))]
    pub question: String,
    pub selected_answer: String,
    /// Required for generated questions; exam questions are checked against the bank
    pub correct_answer: Option<String>,
    pub exam_question_id: Option<i64>,
    /// Defaults to the session's topic
    pub topic_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub is_correct: bool,
    pub correct_answer: String,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub score_percentage: f64,
}

impl From<&TestSession> for SessionSummary {
    fn from(session: &TestSession) -> Self {
        Self {
            session_id: session.id,
            total_questions: session.total_questions,
            correct_answers: session.correct_answers,
            score_percentage: session.score_percentage(),
        }
    }
}

async fn start_test(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    payload: Result<Option<Json<StartRequest>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload?.map(|Json(payload)| payload).unwrap_or_default();

    if let Some(topic_id) = payload.topic_id
        && !topic_repo::exists(&state.pool, topic_id).await?
    {
        return Err(ApiError::NotFound(format!("Topic {topic_id} not found")));
    }
    if let Some(exam_id) = payload.exam_id
        && !exam_repo::exists(&state.pool, exam_id).await?
    {
        return Err(ApiError::NotFound(format!("Exam {exam_id} not found")));
    }

    let session = session_repo::start(
        &state.pool,
        auth_user.user_id,
        payload.topic_id,
        payload.exam_id,
    )
    .await?;

    tracing::info!(session_id = %session.id, "Test session started");

    Ok((
        StatusCode::CREATED,
        Json(StartResponse {
            session_id: session.id,
            started_at: session.started_at,
        }),
    ))
}

/// Make sure `session` exists, belongs to `user_id` and, if requested, is still open
fn check_session(
    session: Option<TestSession>,
    session_id: Uuid,
    user_id: Uuid,
    require_open: bool,
) -> Result<TestSession, ApiError> {
    let session =
        session.ok_or_else(|| ApiError::NotFound(format!("Test session {session_id} not found")))?;

    if session.user_id != user_id {
        return Err(ApiError::Forbidden(
            "This test session belongs to another user".to_string(),
        ));
    }
    if require_open && session.is_finished() {
        return Err(ApiError::Conflict(
            "This test session is already finished".to_string(),
        ));
    }

    Ok(session)
}

/// Bank questions only count towards a session on their own exam
fn check_bank_question(session: &TestSession, question: &ExamQuestion) -> Result<(), ApiError> {
    if session.exam_id == Some(question.exam_id) {
        return Ok(());
    }

    Err(ApiError::Validation(format!(
        "Exam question {} does not belong to this test session's exam",
        question.id
    )))
}

async fn record_answer(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let question = require_text("question", &payload.question)?.to_string();
    let selected_answer = normalize_answer("selected_answer", &payload.selected_answer)?;

    let bank_question = match payload.exam_question_id {
        Some(question_id) => Some(
            exam_repo::find_question(&state.pool, question_id)
                .await?
                .ok_or_else(|| {
                    ApiError::NotFound(format!("Exam question {question_id} not found"))
                })?,
        ),
        None => None,
    };

    let correct_answer = match (&bank_question, payload.correct_answer.as_deref()) {
        (Some(bank_question), _) => {
            normalize_answer("correct_answer", &bank_question.correct_answer)?
        }
        (None, Some(correct_answer)) => normalize_answer("correct_answer", correct_answer)?,
        (None, None) => {
            return Err(ApiError::Validation(
                "Either exam_question_id or correct_answer is required".to_string(),
            ));
        }
    };

    let is_correct = selected_answer == correct_answer;

    // Lock the session row so concurrent answers keep the counters consistent
    let mut tx = state.pool.begin().await?;

    let session = check_session(
        session_repo::find_for_update(&mut *tx, payload.session_id).await?,
        payload.session_id,
        auth_user.user_id,
        true,
    )?;

    if let Some(bank_question) = &bank_question {
        check_bank_question(&session, bank_question)?;
    }
    if let Some(topic_id) = payload.topic_id
        && !topic_repo::exists(&mut *tx, topic_id).await?
    {
        return Err(ApiError::NotFound(format!("Topic {topic_id} not found")));
    }

    session_repo::insert_answer(
        &mut *tx,
        &NewAnswer {
            session_id: session.id,
            user_id: auth_user.user_id,
            topic_id: payload.topic_id.or(session.topic_id),
            exam_question_id: payload.exam_question_id,
            question,
            selected_answer,
            correct_answer: correct_answer.clone(),
            is_correct,
        },
    )
    .await?;
    session_repo::increment_counters(&mut *tx, session.id, is_correct).await?;

    tx.commit().await?;

    Ok(Json(AnswerResponse {
        is_correct,
        correct_answer,
    }))
}

/// Close a session and return its score; finishing twice returns the same summary
async fn finish_test(
    auth_user: AuthUser,
    State(state): State<ApiState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSummary>, ApiError> {
    let mut tx = state.pool.begin().await?;

    check_session(
        session_repo::find_for_update(&mut *tx, session_id).await?,
        session_id,
        auth_user.user_id,
        false,
    )?;
    let session = session_repo::finish(&mut *tx, session_id).await?;

    tx.commit().await?;

    tracing::info!(
        session_id = %session.id,
        total = session.total_questions,
        correct = session.correct_answers,
        "Test session finished"
    );

    Ok(Json(SessionSummary::from(&session)))
}

/// Per-topic aggregates of the caller's answers
async fn user_stats(
    auth_user: AuthUser,
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let topics = stats_repo::topic_stats(&state.pool, auth_user.user_id).await?;

    Ok(Json(json!({ "topics": topics })))
}
