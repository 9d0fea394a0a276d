//! Request IDs for log correlation.
//!
//! [`request_id_middleware`] tags each request with an ID and echoes it back.
//! [`RequestSpan`] builds the per-request trace span from that ID. The span
//! declares an empty `user_id` field that the auth extractor fills in.

use axum::{
    extract::Request,
    http::{self, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tower_http::trace::MakeSpan;
use tracing::Span;
use uuid::Uuid;

/// Header name for the request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest client-supplied ID we keep
const MAX_CLIENT_ID_LEN: usize = 128;

/// ID of the current request, stored in the request extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuse the client's ID when it is sane, otherwise mint a UUID
    fn from_request(req: &Request) -> Self {
        let id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty() && v.len() <= MAX_CLIENT_ID_LEN)
            .map_or_else(|| Uuid::new_v4().to_string(), String::from);

        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Tags the request with an ID and echoes it in the response headers.
///
/// Must wrap the trace layer so [`RequestSpan`] can read the ID.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = RequestId::from_request(&req);
    let header_value = HeaderValue::from_str(request_id.as_str()).ok();

    req.extensions_mut().insert(request_id);
    let mut response = next.run(req).await;

    if let Some(value) = header_value {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

/// Span maker for `TraceLayer`: one `request` span per request
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &http::Request<B>) -> Span {
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map_or("-", RequestId::as_str);

        tracing::info_span!(
            "request",
            request_id = %request_id,
            method = %request.method(),
            uri = %request.uri(),
            user_id = tracing::field::Empty,
        )
    }
}
