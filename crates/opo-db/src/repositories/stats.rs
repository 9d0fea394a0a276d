use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::TopicStats;

/// Per-topic answer aggregates for a user, computed by the database function.
pub async fn topic_stats<'e, E>(executor: E, user_id: Uuid) -> Result<Vec<TopicStats>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT topic_id, topic_title, answered, correct, accuracy
            FROM get_user_topic_stats($1)
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}
