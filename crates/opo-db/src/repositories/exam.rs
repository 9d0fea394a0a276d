use sqlx::{Executor, Postgres};

use crate::models::{Exam, ExamQuestion};

pub async fn list_all<'e, E>(executor: E) -> Result<Vec<Exam>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                e.id,
                e.title,
                e.year,
                e.description,
                COUNT(q.id) AS question_count
            FROM exams e
            LEFT JOIN exam_questions q ON q.exam_id = e.id
            GROUP BY e.id, e.title, e.year, e.description
            ORDER BY e.year DESC NULLS LAST, e.id
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn exists<'e, E>(executor: E, exam_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(SELECT 1 FROM exams WHERE id = $1)
        "#,
    )
    .bind(exam_id)
    .fetch_one(executor)
    .await
}

/// Questions of an exam in their original order, or shuffled.
pub async fn questions<'e, E>(
    executor: E,
    exam_id: i64,
    limit: i64,
    shuffle: bool,
) -> Result<Vec<ExamQuestion>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, exam_id, position, question, options, correct_answer, explanation
            FROM exam_questions
            WHERE exam_id = $1
            ORDER BY CASE WHEN $3 THEN random() END, position
            LIMIT $2
        "#,
    )
    .bind(exam_id)
    .bind(limit)
    .bind(shuffle)
    .fetch_all(executor)
    .await
}

pub async fn find_question<'e, E>(executor: E, question_id: i64) -> Result<Option<ExamQuestion>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, exam_id, position, question, options, correct_answer, explanation
            FROM exam_questions
            WHERE id = $1
        "#,
    )
    .bind(question_id)
    .fetch_optional(executor)
    .await
}
