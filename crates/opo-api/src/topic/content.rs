use opo_db::{models::TopicContent, repositories::topic as topic_repo};

use crate::{ApiState, error::ApiError};

/// A topic together with the text questions and tutoring are drawn from
#[derive(Debug, Clone)]
pub struct TopicText {
    pub topic: TopicContent,
    pub text: String,
}

/// Load the text of `topic_id`.
///
/// Topics without stored content fall back to their PDF, whose extracted
/// text is saved so later requests skip the download.
pub async fn load_text(state: &ApiState, topic_id: i64) -> Result<TopicText, ApiError> {
    let topic = topic_repo::find_content(&state.pool, topic_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Topic {topic_id} not found")))?;

    if let Some(text) = topic.text() {
        let text = text.to_string();
        return Ok(TopicText { topic, text });
    }

    let Some(pdf_url) = topic.pdf_url().map(str::to_string) else {
        return Err(ApiError::NotFound(format!(
            "Topic {topic_id} has no content yet"
        )));
    };

    tracing::info!(topic_id, pdf_url = %pdf_url, "Extracting topic text from PDF");
    let text = state.pdf.fetch_text(&pdf_url).await?;

    if let Err(e) = topic_repo::store_content(&state.pool, topic_id, &text).await {
        tracing::warn!(topic_id, error = %e, "Failed to save extracted topic text");
    }

    Ok(TopicText { topic, text })
}
