//! Mock generator for local development and tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use super::{GenerationError, TextGenerator};

const CANNED_QUESTION: &str = r#"```json
[
  {
    "fragment": 1,
    "question": "Pregunta de prueba generada sin conexión con la IA",
    "options": {"A": "Opción A", "B": "Opción B", "C": "Opción C", "D": "Opción D"},
    "correct_answer": "A",
    "explanation": "Respuesta simulada."
  }
]
```"#;

/// Generator returning scripted or canned responses.
///
/// Scripted responses are returned in order; once they run out the mock
/// answers with a canned question when the prompt asks for the question
/// format and with a fixed sentence otherwise. Every prompt is recorded.
#[derive(Debug, Clone, Default)]
pub struct MockGenerator {
    script: Arc<Mutex<VecDeque<Result<String, GenerationError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that replays `responses` before falling back to canned output.
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::new();
        for response in responses {
            mock.push(Ok(response.into()));
        }
        mock
    }

    /// Queue one more response.
    pub fn push(&self, response: Result<String, GenerationError>) {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(response);
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();

        match scripted {
            Some(response) => response,
            None if prompt.contains("\"correct_answer\"") => Ok(CANNED_QUESTION.to_string()),
            None => Ok("Respuesta simulada del tutor.".to_string()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
