//! Text generation backends.
//!
//! Handlers only see the [`TextGenerator`] trait; the concrete provider is
//! picked from configuration when the state is built.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::{GeminiConfig, GeminiGenerator};
pub use mock::MockGenerator;

/// Error type for generation requests.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    #[error("provider API error: {0}")]
    Api(String),

    #[error("provider rate limit reached")]
    RateLimited,

    #[error("response blocked by the provider's safety filters")]
    ContentFiltered,

    #[error("provider returned no text")]
    EmptyResponse,

    #[error("network error: {0}")]
    Network(String),
}

/// A completion endpoint: prompt in, free-form text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Name used in logs and metrics labels.
    fn name(&self) -> &'static str;
}
