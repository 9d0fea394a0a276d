pub mod auth;
pub mod config;
pub mod error;
pub mod exam;
pub mod generator;
pub mod jobs;
pub mod metrics;
pub mod middleware;
pub mod practice;
pub mod question;
pub mod router;
pub mod state;
pub mod topic;
pub mod tracing;
pub mod tutor;
pub mod validation;

pub use config::ApiConfig;
pub use state::{ApiState, QuestionSettings};
