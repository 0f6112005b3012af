//! Bearer token authentication.
//!
//! Ships a demo token flow a real project replaces with JWT verification:
//! `POST /auth/token` issues the fixed demo token, and the [`CurrentUser`]
//! extractor validates `Authorization: Bearer <token>` on protected routes.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::app::AppState;
use crate::error::ApiError;

/// Token accepted by the demo flow.
const DEMO_TOKEN: &str = "demo-token";

/// Credentials presented to the token endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Issued bearer token.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// An authenticated principal.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub scopes: Vec<String>,
}

/// Authentication routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/auth/token", post(issue_token))
}

/// Issue a bearer token.
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = "auth",
    request_body = TokenRequest,
    responses((status = 200, description = "Token issued", body = TokenResponse))
)]
pub(crate) async fn issue_token(Json(body): Json<TokenRequest>) -> Json<TokenResponse> {
    // Demo flow: every credential pair receives the fixed token.
    tracing::info!(target: "bedrock::auth", user = %body.username, "✔ token issued");
    Json(TokenResponse {
        access_token: DEMO_TOKEN.to_string(),
        token_type: "bearer".to_string(),
    })
}

/// Decode a bearer token into a user.
fn decode_token(token: &str) -> Option<User> {
    if token == DEMO_TOKEN {
        return Some(User {
            id: 1,
            username: "demo".to_string(),
            scopes: vec!["read".to_string(), "write".to_string()],
        });
    }
    None
}

/// Extract the bearer token from request headers.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
}

/// Extractor rejecting requests without a valid bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = extract_bearer(&parts.headers)
            .and_then(decode_token)
            .ok_or_else(|| {
                tracing::warn!(target: "bedrock::auth", "✖ token rejected");
                ApiError::unauthorized("Invalid or expired token")
            })?;

        tracing::debug!(target: "bedrock::auth", user = %user.username, "✔ token accepted");
        Ok(Self(user))
    }
}
