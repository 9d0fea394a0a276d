use std::{sync::Arc, time::Duration};

use sqlx::PgPool;

use crate::{
    ApiConfig,
    auth::{JwtVerifier, RemoteVerifier, TokenVerifier},
    config::{Environment, GeneratorProvider},
    generator::{GeminiConfig, GeminiGenerator, MockGenerator, TextGenerator},
    topic::pdf::PdfFetcher,
};

/// Tuning knobs of question generation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuestionSettings {
    /// How many recent questions of a user/topic pair are checked for repeats
    pub history_window: i64,
    /// Similarity (0-100) at or above which a candidate is a repeat
    pub similarity_threshold: u8,
    /// Generation rounds before settling for the least similar candidate
    pub max_attempts: u32,
    /// Fragments (and so candidates) requested per round
    pub candidates_per_attempt: usize,
    /// Paragraphs at or below this many characters are not used as fragments
    pub min_fragment_len: usize,
}

impl Default for QuestionSettings {
    fn default() -> Self {
        Self {
            history_window: 20,
            similarity_threshold: opo_dedup::DEFAULT_SIMILARITY_THRESHOLD,
            max_attempts: 3,
            candidates_per_attempt: 3,
            min_fragment_len: opo_dedup::DEFAULT_MIN_FRAGMENT_LEN,
        }
    }
}

impl From<&ApiConfig> for QuestionSettings {
    fn from(config: &ApiConfig) -> Self {
        Self {
            history_window: config.history_window.max(0),
            similarity_threshold: config.similarity_threshold.min(100),
            max_attempts: config.max_generation_attempts.max(1),
            candidates_per_attempt: config.candidates_per_attempt.max(1),
            min_fragment_len: config.min_fragment_len,
        }
    }
}

#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
    pub generator: Arc<dyn TextGenerator>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub environment: Environment,
    pub questions: QuestionSettings,
    pub pdf: PdfFetcher,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> anyhow::Result<Self> {
        let generator: Arc<dyn TextGenerator> = match config.generator_provider {
            GeneratorProvider::Gemini => Arc::new(GeminiGenerator::new(GeminiConfig {
                api_key: config.gemini_api_key.clone(),
                model: config.gemini_model.clone(),
                base_url: config.gemini_base_url.clone(),
            })?),
            GeneratorProvider::Mock => {
                tracing::warn!("Using the mock text generator, AI responses are canned");
                Arc::new(MockGenerator::new())
            }
        };

        let verifier: Arc<dyn TokenVerifier> = match &config.supabase_jwt_secret {
            Some(secret) if !secret.is_empty() => Arc::new(JwtVerifier::new(secret.clone())),
            _ => {
                tracing::info!("No JWT secret configured, verifying tokens with the identity provider");
                Arc::new(RemoteVerifier::new(
                    &config.supabase_url,
                    config.supabase_key.clone(),
                )?)
            }
        };

        let pdf = PdfFetcher::new(
            Duration::from_secs(config.pdf_fetch_timeout_secs),
            config.pdf_max_bytes,
        )?;

        Ok(Self {
            pool,
            generator,
            verifier,
            environment: config.env,
            questions: QuestionSettings::from(config),
            pdf,
        })
    }
}

impl std::fmt::Debug for ApiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiState")
            .field("generator", &self.generator.name())
            .field("environment", &self.environment)
            .field("questions", &self.questions)
            .finish_non_exhaustive()
    }
}
