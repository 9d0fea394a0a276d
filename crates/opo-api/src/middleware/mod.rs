pub mod cors;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

use axum::{Router, middleware};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::{config::Environment, metrics};

/// Wrap the finished app with the HTTP layers, innermost first:
/// CORS, request tracing, request metrics, request IDs, security headers.
pub fn apply_http_layers(
    app: Router,
    allowed_origins: Vec<String>,
    environment: Environment,
) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(request_id::RequestSpan)
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let app = app
        .layer(cors::create_cors_layer(allowed_origins))
        .layer(trace_layer)
        .layer(middleware::from_fn(metrics::track_metrics))
        .layer(middleware::from_fn(request_id::request_id_middleware));

    security_headers::apply_security_headers(app, environment)
}
