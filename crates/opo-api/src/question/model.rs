use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Multiple-choice question as returned to the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    /// Option letter -> option text
    pub options: BTreeMap<String, String>,
    /// Letter of the right option, always one of the `options` keys
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Question response body: the model's question with the topic spliced in
#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponse {
    #[serde(flatten)]
    pub question: GeneratedQuestion,
    pub topic_id: i64,
}

/// A validated candidate and the fragment number the model tied it to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub fragment: Option<usize>,
    pub question: GeneratedQuestion,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOutput {
    Many(Vec<RawCandidate>),
    Wrapped { questions: Vec<RawCandidate> },
    One(RawCandidate),
}

#[derive(Debug, Deserialize)]
struct RawCandidate {
    #[serde(default)]
    fragment: Option<usize>,
    question: String,
    options: RawOptions,
    correct_answer: String,
    #[serde(default)]
    explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOptions {
    Lettered(BTreeMap<String, String>),
    Listed(Vec<String>),
}

/// Strip Markdown code fences and any prose around the JSON payload.
pub fn clean_model_output(raw: &str) -> String {
    let unfenced = raw
        .trim()
        .replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "");
    let text = unfenced.trim();

    match (text.find(['[', '{']), text.rfind([']', '}'])) {
        (Some(start), Some(end)) if start <= end => text[start..=end].to_string(),
        _ => text.to_string(),
    }
}

/// Parse the model's output into validated candidates.
///
/// Accepts a JSON array of questions, a `{"questions": [...]}` wrapper or a
/// single question object. Candidates that fail validation are dropped; the
/// output is rejected when it is not JSON or nothing valid remains.
pub fn parse_candidates(raw: &str) -> Result<Vec<Candidate>, ApiError> {
    let cleaned = clean_model_output(raw);

    let value: Value =
        serde_json::from_str(&cleaned).map_err(|e| ApiError::InvalidGeneration(e.to_string()))?;

    let raw_candidates = match serde_json::from_value::<RawOutput>(value) {
        Ok(RawOutput::Many(candidates) | RawOutput::Wrapped { questions: candidates }) => {
            candidates
        }
        Ok(RawOutput::One(candidate)) => vec![candidate],
        Err(_) => {
            return Err(ApiError::InvalidGeneration(
                "output does not match the question format".to_string(),
            ));
        }
    };

    let total = raw_candidates.len();
    let candidates: Vec<Candidate> = raw_candidates
        .into_iter()
        .filter_map(|raw| match validate(raw) {
            Ok(candidate) => Some(candidate),
            Err(reason) => {
                tracing::debug!(%reason, "Dropping malformed candidate");
                None
            }
        })
        .collect();

    if candidates.is_empty() {
        return Err(ApiError::InvalidGeneration(format!(
            "none of the {total} generated questions is well formed"
        )));
    }

    Ok(candidates)
}

fn validate(raw: RawCandidate) -> Result<Candidate, String> {
    let question = raw.question.trim().to_string();
    if question.is_empty() {
        return Err("empty question".to_string());
    }

    let options: BTreeMap<String, String> = match raw.options {
        RawOptions::Lettered(map) => map
            .into_iter()
            .map(|(letter, text)| (letter.trim().to_uppercase(), text.trim().to_string()))
            .collect(),
        RawOptions::Listed(list) => ('A'..='Z')
            .zip(list)
            .map(|(letter, text)| (letter.to_string(), text.trim().to_string()))
            .collect(),
    };

    if options.len() < 2 {
        return Err("fewer than two options".to_string());
    }
    if options.values().any(String::is_empty) {
        return Err("empty option".to_string());
    }

    let correct_answer = answer_letter(&raw.correct_answer)
        .filter(|letter| options.contains_key(letter))
        .ok_or_else(|| format!("correct answer {:?} is not an option", raw.correct_answer))?;

    Ok(Candidate {
        fragment: raw.fragment,
        question: GeneratedQuestion {
            question,
            options,
            correct_answer,
            explanation: raw
                .explanation
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
        },
    })
}

/// Extract the option letter from answers like `"b"`, `"B)"` or `"C. Texto"`.
pub fn answer_letter(answer: &str) -> Option<String> {
    let answer = answer.trim();
    let mut chars = answer.chars();
    let first = chars.next()?;

    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.next().is_some_and(char::is_alphanumeric) {
        return None;
    }

    Some(first.to_ascii_uppercase().to_string())
}
