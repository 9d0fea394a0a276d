use serde::Deserialize;

/// Deployment environment, read from `ENV`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Which text generator backs the AI endpoints, read from `GENERATOR_PROVIDER`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorProvider {
    #[default]
    Gemini,
    /// Canned output, for running the app without an API key
    Mock,
}

/// Application configuration, deserialized from environment variables.
///
/// Field names map to upper-case variables (`database_url` -> `DATABASE_URL`).
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,

    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,
    #[serde(default)]
    pub run_migrations: bool,

    /// Base URL of the hosted backend, used for remote token verification
    pub supabase_url: String,
    /// Project API key sent alongside remote token verification
    pub supabase_key: String,
    /// When set, bearer tokens are verified locally with this HS256 secret
    pub supabase_jwt_secret: Option<String>,

    #[serde(default)]
    pub generator_provider: GeneratorProvider,
    #[serde(default)]
    pub gemini_api_key: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// Comma-separated list of origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,

    #[serde(default = "default_history_window")]
    pub history_window: i64,
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: u8,
    #[serde(default = "default_max_generation_attempts")]
    pub max_generation_attempts: u32,
    #[serde(default = "default_candidates_per_attempt")]
    pub candidates_per_attempt: usize,
    #[serde(default = "default_min_fragment_len")]
    pub min_fragment_len: usize,
    #[serde(default = "default_history_retention_days")]
    pub history_retention_days: i32,

    /// Timeout for downloading a topic PDF
    #[serde(default = "default_pdf_fetch_timeout_secs")]
    pub pdf_fetch_timeout_secs: u64,
    #[serde(default = "default_pdf_max_bytes")]
    pub pdf_max_bytes: usize,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_connections() -> u32 {
    10
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_allowed_origins() -> String {
    "http://localhost:8080".to_string()
}

const fn default_history_window() -> i64 {
    20
}

const fn default_similarity_threshold() -> u8 {
    opo_dedup::DEFAULT_SIMILARITY_THRESHOLD
}

const fn default_max_generation_attempts() -> u32 {
    3
}

const fn default_candidates_per_attempt() -> usize {
    3
}

const fn default_min_fragment_len() -> usize {
    opo_dedup::DEFAULT_MIN_FRAGMENT_LEN
}

const fn default_history_retention_days() -> i32 {
    30
}

const fn default_pdf_fetch_timeout_secs() -> u64 {
    30
}

const fn default_pdf_max_bytes() -> usize {
    20 * 1024 * 1024
}
