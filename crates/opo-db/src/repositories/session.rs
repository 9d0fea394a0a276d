use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{NewAnswer, TestSession};

pub async fn start<'e, E>(
    executor: E,
    user_id: Uuid,
    topic_id: Option<i64>,
    exam_id: Option<i64>,
) -> Result<TestSession, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO test_sessions (user_id, topic_id, exam_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, topic_id, exam_id, started_at, finished_at, total_questions, correct_answers
        "#,
    )
    .bind(user_id)
    .bind(topic_id)
    .bind(exam_id)
    .fetch_one(executor)
    .await
}

/// Fetch a session, locking the row for the rest of the transaction.
pub async fn find_for_update<'e, E>(executor: E, session_id: Uuid) -> Result<Option<TestSession>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, topic_id, exam_id, started_at, finished_at, total_questions, correct_answers
            FROM test_sessions
            WHERE id = $1
            FOR UPDATE
        "#,
    )
    .bind(session_id)
    .fetch_optional(executor)
    .await
}

pub async fn insert_answer<'e, E>(executor: E, answer: &NewAnswer) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO test_answers
                (session_id, user_id, topic_id, exam_question_id, question, selected_answer, correct_answer, is_correct)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(answer.session_id)
    .bind(answer.user_id)
    .bind(answer.topic_id)
    .bind(answer.exam_question_id)
    .bind(&answer.question)
    .bind(&answer.selected_answer)
    .bind(&answer.correct_answer)
    .bind(answer.is_correct)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn increment_counters<'e, E>(executor: E, session_id: Uuid, is_correct: bool) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE test_sessions
            SET total_questions = total_questions + 1,
                correct_answers = correct_answers + CASE WHEN $2 THEN 1 ELSE 0 END
            WHERE id = $1
        "#,
    )
    .bind(session_id)
    .bind(is_correct)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn finish<'e, E>(executor: E, session_id: Uuid) -> Result<TestSession, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE test_sessions
            SET finished_at = COALESCE(finished_at, NOW())
            WHERE id = $1
            RETURNING id, user_id, topic_id, exam_id, started_at, finished_at, total_questions, correct_answers
        "#,
    )
    .bind(session_id)
    .fetch_one(executor)
    .await
}

/// Close sessions left open for more than a day.
pub async fn close_abandoned<'e, E>(executor: E) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE test_sessions
            SET finished_at = NOW()
            WHERE finished_at IS NULL
            AND started_at < NOW() - INTERVAL '1 day'
        "#,
    )
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
