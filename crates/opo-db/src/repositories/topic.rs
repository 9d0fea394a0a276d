use sqlx::{Executor, Postgres};

use crate::models::{TopicContent, TopicSummary};

pub async fn list_all<'e, E>(executor: E) -> Result<Vec<TopicSummary>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                id,
                title,
                summary,
                pdf_url,
                (content IS NOT NULL AND btrim(content) <> '') AS has_content
            FROM topics
            ORDER BY id
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn find_content<'e, E>(executor: E, topic_id: i64) -> Result<Option<TopicContent>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, title, summary, content, pdf_url
            FROM topics
            WHERE id = $1
        "#,
    )
    .bind(topic_id)
    .fetch_optional(executor)
    .await
}

/// Pick a random topic that has text, stored or still in its PDF.
pub async fn random_with_content<'e, E>(executor: E) -> Result<Option<i64>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT id
            FROM topics
            WHERE (content IS NOT NULL AND btrim(content) <> '')
               OR (pdf_url IS NOT NULL AND btrim(pdf_url) <> '')
            ORDER BY random()
            LIMIT 1
        "#,
    )
    .fetch_optional(executor)
    .await
}

pub async fn exists<'e, E>(executor: E, topic_id: i64) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(SELECT 1 FROM topics WHERE id = $1)
        "#,
    )
    .bind(topic_id)
    .fetch_one(executor)
    .await
}

/// Save text extracted from the topic PDF.
pub async fn store_content<'e, E>(executor: E, topic_id: i64, content: &str) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE topics
            SET content = $2
            WHERE id = $1
        "#,
    )
    .bind(topic_id)
    .bind(content)
    .execute(executor)
    .await?;

    Ok(())
}
