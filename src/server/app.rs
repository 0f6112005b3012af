//! Main application server.
//!
//! Provides the complete server application: shared state, router and
//! middleware assembly, signal handling and graceful shutdown coordination.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use super::example::Item;
use super::{auth, docs, example, health, metrics, observability, readme};
use crate::error::ApiError;
use crate::{Config, Result};

/// How long a single request may run before being cut off.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared application state handed to every handler.
#[derive(Debug)]
pub struct AppState {
    /// Validated runtime configuration.
    pub config: Config,
    /// Startup instant, reported by the readiness probe.
    pub started_at: DateTime<Utc>,
    /// Demo item store backing the `/example/items` routes.
    pub items: RwLock<Vec<Item>>,
}

impl AppState {
    /// Create fresh state from a configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            started_at: Utc::now(),
            items: RwLock::new(Vec::new()),
        }
    }
}

/// Application server.
pub struct App {
    state: Arc<AppState>,
}

impl App {
    /// Create a new application from a validated configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            state: Arc::new(AppState::new(config)),
        }
    }

    /// Build the router with all endpoints and middleware.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.state))
    }

    /// Run the server until shutdown signal.
    ///
    /// The server listens for SIGTERM (Unix) and Ctrl+C signals,
    /// then gracefully shuts down all connections.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot start or encounters
    /// a fatal error during execution.
    pub async fn run(self) -> Result<()> {
        let addr: SocketAddr = self
            .state
            .config
            .server_addr()
            .parse()
            .map_err(|e| crate::Error::config(format!("invalid address: {e}")))?;

        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            crate::error::ServerError::BindFailed {
                address: addr.to_string(),
                reason: e.to_string(),
            }
        })?;

        tracing::info!(target: "bedrock::app", %addr, "✔ server listening");

        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| crate::error::ServerError::Request(e.to_string()))?;

        tracing::info!(target: "bedrock::app", "✔ server shut down gracefully");
        Ok(())
    }
}

/// Assemble the full router for the given state.
///
/// Layer order (outermost first): request-id stamping, request logging,
/// request-id propagation, security headers, timeout, compression, CORS.
#[must_use]
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    let mut router = Router::new()
        .merge(docs::router())
        .merge(readme::router())
        .merge(health::router())
        .merge(auth::router())
        .nest("/example", example::router());

    if state.config.metrics_enabled {
        router = router
            .route("/metrics", get(metrics::metrics_handler))
            .layer(axum::middleware::from_fn(metrics::track_metrics));
    }

    router
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .fallback(fallback)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(axum::middleware::from_fn(observability::trace_requests))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("no-referrer"),
                ))
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(CompressionLayer::new())
                .layer(cors),
        )
        .with_state(state)
}

/// CORS layer from the configured origins.
fn cors_layer(config: &Config) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .cors_origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Unknown routes answer with the uniform error envelope.
async fn fallback() -> ApiError {
    ApiError::not_found("resource not found")
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C).
///
/// This function will block until one of the following signals is received:
/// - `SIGTERM` (Unix/Linux only)
/// - `SIGINT` (Ctrl+C on all platforms)
///
/// Once a signal is received, the function returns and allows the server
/// to begin graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!(target: "bedrock::app", "Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!(target: "bedrock::app", "Received SIGTERM, initiating shutdown");
        }
    }
}
