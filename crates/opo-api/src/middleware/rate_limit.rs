//! Per-IP rate limiting with `tower_governor`.
//!
//! Clients are keyed with `SmartIpKeyExtractor`, which reads
//! `X-Forwarded-For`, `X-Real-IP` and `Forwarded` before falling back to the
//! peer address. The server must be started with connect info for the
//! fallback to work.

/// Question generation: 1 request per second, burst of 5
pub const GENERATION_RATE_PER_SECOND: u64 = 1;
pub const GENERATION_BURST_SIZE: u32 = 5;

/// Tutor chat and concept explanations: 2 requests per second, burst of 10
pub const TUTOR_RATE_PER_SECOND: u64 = 2;
pub const TUTOR_BURST_SIZE: u32 = 10;

/// Build a `GovernorLayer` keyed by client IP.
///
/// A macro rather than a function because the layer's type spells out the
/// key extractor, the rate-limit middleware and the body type.
#[macro_export]
macro_rules! make_rate_limit_layer {
    ($per_second:expr, $burst_size:expr) => {{
        let config = ::tower_governor::governor::GovernorConfigBuilder::default()
            .per_second($per_second)
            .burst_size($burst_size)
            .key_extractor(::tower_governor::key_extractor::SmartIpKeyExtractor)
            .use_headers()
            .finish()
            .expect("rate limit period and burst size must be non-zero");

        ::tower_governor::GovernorLayer::new(config)
    }};
}
