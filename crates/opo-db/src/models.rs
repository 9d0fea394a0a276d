use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// Topic as shown in the topic list
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TopicSummary {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub pdf_url: Option<String>,
    /// Whether the topic has extracted text and can be used for questions
    pub has_content: bool,
}

/// Topic with its full extracted text
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TopicContent {
    pub id: i64,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub pdf_url: Option<String>,
}

impl TopicContent {
    /// The topic text, if it is present and not blank
    pub fn text(&self) -> Option<&str> {
        non_blank(self.content.as_deref())
    }

    /// Where the text can be extracted from when there is none stored
    pub fn pdf_url(&self) -> Option<&str> {
        non_blank(self.pdf_url.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Past exam with the size of its question bank
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Exam {
    pub id: i64,
    pub title: String,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub question_count: i64,
}

/// Option letter -> option text.
///
/// Banks are imported from several sources; options stored as a plain list
/// are lettered `A`, `B`, ... in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredOptions")]
pub struct ExamOptions(pub BTreeMap<String, String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredOptions {
    Lettered(BTreeMap<String, String>),
    Listed(Vec<String>),
}

impl From<StoredOptions> for ExamOptions {
    fn from(stored: StoredOptions) -> Self {
        match stored {
            StoredOptions::Lettered(options) => Self(options),
            StoredOptions::Listed(options) => Self(
                ('A'..='Z')
                    .map(String::from)
                    .zip(options)
                    .collect(),
            ),
        }
    }
}

/// Question from an exam bank
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExamQuestion {
    pub id: i64,
    pub exam_id: i64,
    pub position: i32,
    pub question: String,
    pub options: Json<ExamOptions>,
    pub correct_answer: String,
    pub explanation: Option<String>,
}

/// A user's test session
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TestSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub topic_id: Option<i64>,
    pub exam_id: Option<i64>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub total_questions: i32,
    pub correct_answers: i32,
}

impl TestSession {
    pub const fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Share of correct answers, 0.0 when nothing was answered
    pub fn score_percentage(&self) -> f64 {
        if self.total_questions > 0 {
            f64::from(self.correct_answers) / f64::from(self.total_questions) * 100.0
        } else {
            0.0
        }
    }
}

/// Insert struct for a recorded answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAnswer {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub topic_id: Option<i64>,
    pub exam_question_id: Option<i64>,
    pub question: String,
    pub selected_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Per-topic aggregate returned by `get_user_topic_stats`
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TopicStats {
    pub topic_id: i64,
    pub topic_title: String,
    pub answered: i64,
    pub correct: i64,
    pub accuracy: f64,
}
