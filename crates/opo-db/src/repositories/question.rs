use sqlx::{Executor, Postgres, types::Json};
use uuid::Uuid;

/// Most recent question texts served to a user for a topic, newest first.
pub async fn recent_for_user_topic<'e, E>(
    executor: E,
    user_id: Uuid,
    topic_id: i64,
    limit: i64,
) -> Result<Vec<String>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT question
            FROM generated_questions
            WHERE user_id = $1 AND topic_id = $2
            ORDER BY created_at DESC
            LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(topic_id)
    .bind(limit)
    .fetch_all(executor)
    .await
}

pub async fn record<'e, E>(
    executor: E,
    user_id: Uuid,
    topic_id: i64,
    question: &str,
    payload: &serde_json::Value,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO generated_questions (user_id, topic_id, question, payload)
            VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(topic_id)
    .bind(question)
    .bind(Json(payload))
    .execute(executor)
    .await?;
    Ok(())
}

/// Delete history rows older than `retention_days`.
pub async fn prune_older_than<'e, E>(executor: E, retention_days: i32) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM generated_questions
            WHERE created_at < NOW() - make_interval(days => $1)
        "#,
    )
    .bind(retention_days)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
