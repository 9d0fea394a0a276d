//! Prometheus metrics for monitoring API performance and health.

use std::{
    sync::LazyLock,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

static UUID_SEGMENT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}").ok()
});
static NUMBER_SEGMENT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"/\d+").ok());

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
        )?
        // Generation calls are slow, give them their own buckets
        .set_buckets_for_metric(
            Matcher::Full("generation_duration_seconds".to_string()),
            &[0.25, 0.5, 1.0, 2.0, 4.0, 8.0, 16.0, 32.0],
        )?;

    let handle = builder.install_recorder()?;

    Ok(handle)
}

/// Middleware to record HTTP request metrics
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    gauge!("http_requests_in_flight", "method" => method.clone(), "path" => path.clone())
        .increment(1.0);

    let response = next.run(req).await;

    gauge!("http_requests_in_flight", "method" => method.clone(), "path" => path.clone())
        .decrement(1.0);

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

/// Normalize URL paths to reduce cardinality in metrics
/// Replaces UUIDs and numeric IDs with placeholders
fn normalize_path(path: &str) -> String {
    let mut normalized = path.to_string();

    if let Some(uuid) = UUID_SEGMENT.as_ref() {
        normalized = uuid.replace_all(&normalized, ":id").into_owned();
    }
    if let Some(number) = NUMBER_SEGMENT.as_ref() {
        normalized = number.replace_all(&normalized, "/:id").into_owned();
    }

    normalized
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

/// Record a call to the text generator
///
/// `kind` is what was asked for (`question`, `tutor`, `explanation`).
pub fn record_generation_event(
    kind: &'static str,
    provider: &'static str,
    success: bool,
    elapsed: Duration,
) {
    let status = if success { "success" } else { "failure" };

    counter!(
        "generation_requests_total",
        "kind" => kind,
        "provider" => provider,
        "status" => status
    )
    .increment(1);

    histogram!("generation_duration_seconds", "kind" => kind, "provider" => provider)
        .record(elapsed.as_secs_f64());
}

/// Record a question served although it resembles the user's history
pub fn record_duplicate_fallback() {
    counter!("question_duplicate_fallbacks_total").increment(1);
}

/// Record bearer token verification
pub fn record_auth_event(success: bool) {
    let status = if success { "success" } else { "failure" };

    counter!("auth_verifications_total", "status" => status).increment(1);
}

/// Record a background job run
pub fn record_job_run(job: &'static str, affected_rows: u64, success: bool) {
    let status = if success { "success" } else { "error" };

    counter!("job_runs_total", "job" => job, "status" => status).increment(1);
    counter!("job_rows_affected_total", "job" => job).increment(affected_rows);
}
