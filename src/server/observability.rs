//! Structured logging and tracing configuration.
//!
//! Provides setup for observability using the `tracing` crate with:
//! - Structured logging with JSON output option
//! - Configurable log levels
//! - The request log convention applied by [`trace_requests`]
//!
//! # Log convention
//!
//! Request lines start with a status marker and carry key=value fields:
//!
//! ```text
//! ▶ request received    rid=… method=GET path=/docs ip=…
//! ✔ request completed   rid=… method=GET path=/docs status=200 latency_ms=3 size=1512
//! ✖ request failed      rid=… method=GET path=/boom status=500 latency_ms=1 size=-
//! ```
//!
//! The component is the `tracing` target (`bedrock::http` here). Completion
//! level follows the status class: 2xx/3xx info, 4xx warn, 5xx error.
//! Authorization and cookie values never appear in fields.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Registry,
};
use uuid::Uuid;

/// Marker prefix for request start lines.
pub const MARK_START: &str = "▶";
/// Marker prefix for completed requests (status < 500).
pub const MARK_OK: &str = "✔";
/// Marker prefix for failed requests (status >= 500).
pub const MARK_ERR: &str = "✖";

/// Initialize tracing with the given configuration.
///
/// Sets up the tracing subscriber with:
/// - Configured log level from environment or config
/// - Structured logging output (plain text or JSON)
///
/// # Panics
///
/// Panics if a tracing subscriber has already been initialized in this
/// process.
pub fn init_tracing(level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        let json_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        Registry::default().with(env_filter).with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        Registry::default().with(env_filter).with(fmt_layer).init();
    }

    tracing::debug!("Tracing initialized: level={}, json={}", level, json);
}

/// Request logging middleware applying the log convention.
///
/// Reads the request id set by `SetRequestIdLayer` (falling back to a fresh
/// UUID when the layer is absent, e.g. in router-only tests), logs the
/// `▶` start line, runs the inner service inside a request span, then logs
/// the `✔`/`✖` completion line with status, latency and response size.
pub async fn trace_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let rid = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned);
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "-".to_string(), |ci| ci.0.ip().to_string());

    let span = spans::request_span(method.as_str(), &path, &rid);

    async move {
        tracing::info!(
            target: "bedrock::http",
            rid = %rid,
            method = %method,
            path = %path,
            ip = %ip,
            "{MARK_START} request received"
        );

        let response = next.run(request).await;

        let status = response.status();
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let size = response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_owned();

        if status.is_server_error() {
            tracing::error!(
                target: "bedrock::http",
                rid = %rid,
                method = %method,
                path = %path,
                status = status.as_u16(),
                latency_ms,
                size = %size,
                "{MARK_ERR} request failed"
            );
        } else if status.is_client_error() {
            tracing::warn!(
                target: "bedrock::http",
                rid = %rid,
                method = %method,
                path = %path,
                status = status.as_u16(),
                latency_ms,
                size = %size,
                "{MARK_OK} request completed"
            );
        } else {
            tracing::info!(
                target: "bedrock::http",
                rid = %rid,
                method = %method,
                path = %path,
                status = status.as_u16(),
                latency_ms,
                size = %size,
                "{MARK_OK} request completed"
            );
        }

        response
    }
    .instrument(span)
    .await
}

/// Span helpers for request handling.
pub mod spans {
    use tracing::{info_span, Span};

    /// Create a new request span with common fields.
    #[must_use]
    pub fn request_span(method: &str, path: &str, request_id: &str) -> Span {
        info_span!(
            target: "bedrock::http",
            "request",
            method = %method,
            path = %path,
            rid = %request_id,
        )
    }
}
