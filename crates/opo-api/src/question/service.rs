use std::time::Instant;

use opo_db::repositories::question as question_repo;
use uuid::Uuid;

use super::{
    model::{self, GeneratedQuestion, QuestionResponse},
    prompt,
};
use crate::{
    ApiState, error::ApiError, generator::TextGenerator, metrics, state::QuestionSettings, topic,
};

/// Result of the duplicate-avoidance loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub question: GeneratedQuestion,
    /// Highest similarity (0-100) against the history
    pub similarity: u8,
    /// Every round produced only repeats and this is the least similar one
    pub duplicate: bool,
    /// Generation rounds used
    pub attempts: u32,
}

/// Generate a question from `content` that does not repeat `history`.
///
/// Runs up to `settings.max_attempts` rounds. Each round asks the model for
/// one candidate per randomly sampled fragment and keeps the first candidate
/// below the similarity threshold. If no round produces one, the least
/// similar candidate seen is returned flagged as a duplicate.
pub async fn generate_unique(
    generator: &dyn TextGenerator,
    content: &str,
    history: &[String],
    settings: &QuestionSettings,
) -> Result<Outcome, ApiError> {
    let fragments = opo_dedup::fragments_or_whole(content, settings.min_fragment_len);
    let mut least_bad: Option<Outcome> = None;

    for attempt in 1..=settings.max_attempts {
        let prompt = {
            let mut rng = rand::thread_rng();
            let sample =
                prompt::sample_fragments(&fragments, settings.candidates_per_attempt, &mut rng);
            prompt::question_prompt(content, &sample, prompt::pick_variety(&mut rng))
        };

        let started = Instant::now();
        let raw = generator.generate(&prompt).await;
        metrics::record_generation_event(
            "question",
            generator.name(),
            raw.is_ok(),
            started.elapsed(),
        );
        let candidates = model::parse_candidates(&raw?)?;

        let texts: Vec<&str> = candidates
            .iter()
            .map(|candidate| candidate.question.question.as_str())
            .collect();
        let Some(selection) =
            opo_dedup::select_candidate(&texts, history, settings.similarity_threshold)
        else {
            continue;
        };

        let Some(candidate) = candidates.into_iter().nth(selection.index) else {
            continue;
        };

        let outcome = Outcome {
            question: candidate.question,
            similarity: selection.similarity,
            duplicate: selection.duplicate,
            attempts: attempt,
        };

        if !outcome.duplicate {
            tracing::debug!(
                attempt,
                similarity = outcome.similarity,
                fragment = ?candidate.fragment,
                "Accepted generated question"
            );
            return Ok(outcome);
        }

        tracing::debug!(
            attempt,
            similarity = outcome.similarity,
            "Every candidate repeats the history, retrying"
        );

        if least_bad
            .as_ref()
            .is_none_or(|best| outcome.similarity < best.similarity)
        {
            least_bad = Some(outcome);
        }
    }

    least_bad.ok_or_else(|| {
        ApiError::InvalidGeneration("the model produced no usable question".to_string())
    })
}

/// Serve a fresh question for `topic_id` to `user_id`.
pub async fn question_for_topic(
    state: &ApiState,
    user_id: Uuid,
    topic_id: i64,
) -> Result<QuestionResponse, ApiError> {
    let content = topic::load_text(state, topic_id).await?.text;

    let history = question_repo::recent_for_user_topic(
        &state.pool,
        user_id,
        topic_id,
        state.questions.history_window,
    )
    .await?;

    let outcome =
        generate_unique(state.generator.as_ref(), &content, &history, &state.questions).await?;

    if outcome.duplicate {
        metrics::record_duplicate_fallback();
        tracing::warn!(
            topic_id,
            similarity = outcome.similarity,
            attempts = outcome.attempts,
            "Serving the least similar question after exhausting attempts"
        );
    }

    spawn_history_write(state, user_id, topic_id, &outcome.question);

    Ok(QuestionResponse {
        question: outcome.question,
        topic_id,
    })
}

/// Record the served question without holding up the response.
fn spawn_history_write(state: &ApiState, user_id: Uuid, topic_id: i64, question: &GeneratedQuestion) {
    let pool = state.pool.clone();
    let question = question.clone();

    tokio::spawn(async move {
        let payload = match serde_json::to_value(&question) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize question for history");
                return;
            }
        };

        if let Err(e) =
            question_repo::record(&pool, user_id, topic_id, &question.question, &payload).await
        {
            tracing::warn!(error = %e, topic_id, "Failed to record question history");
        }
    });
}
