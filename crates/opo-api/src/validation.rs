use crate::{error::ApiError, question::model::answer_letter};

/// Trim `value` and reject it when nothing is left.
///
/// # Examples
/// ```
/// use opo_api::validation::require_text;
///
/// assert_eq!(require_text("query", "  ¿Qué es el BOE?  ").unwrap(), "¿Qué es el BOE?");
/// assert!(require_text("query", "   ").is_err());
/// ```
pub fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!("{field} cannot be empty")));
    }
    Ok(trimmed)
}

/// Normalize an answer to its upper-case option letter (`" b "` -> `"B"`).
pub fn normalize_answer(field: &str, answer: &str) -> Result<String, ApiError> {
    answer_letter(answer).ok_or_else(|| {
        ApiError::Validation(format!(
            "Invalid {field}: '{}'. Must be an option letter such as 'A'",
            answer.trim()
        ))
    })
}
