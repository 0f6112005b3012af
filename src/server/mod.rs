//! HTTP server: routes, middleware, and observability.
//!
//! This module provides:
//! - Router and middleware assembly with graceful shutdown
//! - Documentation mounting (Swagger UI, ReDoc, OpenAPI schema)
//! - README rendering, probes, demo auth and example routes
//! - Tracing setup and Prometheus metrics

pub mod app;
mod auth;
mod docs;
mod envelope;
mod example;
mod health;
mod metrics;
mod observability;
mod readme;

pub use app::{build_router, App, AppState};
pub use auth::{CurrentUser, User};
pub use envelope::{ApiResponse, PageQuery, PaginationMeta};
pub use example::Item;
pub use metrics::init_metrics;
pub use observability::init_tracing;
