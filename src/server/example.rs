//! Example routes exercising the envelope, the in-memory item store,
//! pagination, and authentication.
//!
//! Everything here is starter material meant to be replaced by real
//! features; it exists so the template ships with working, documented
//! endpoints end to end.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::app::AppState;
use super::auth::{CurrentUser, User};
use super::envelope::{ApiResponse, PageQuery};
use crate::error::ApiError;

/// A demo item held in the shared in-memory store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Demo payload returned by `/example/data`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DataResponse {
    pub message: String,
    pub data: Vec<i64>,
}

/// Greeting payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct HelloResponse {
    pub message: String,
}

/// Example routes, mounted under `/example`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/hello", get(hello))
        .route("/error", get(error_demo))
        .route("/data", get(data))
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/items-paged", get(items_paged))
        .route("/secure/profile", get(profile))
}

/// Greeting endpoint.
#[utoipa::path(
    get,
    path = "/example/hello",
    tag = "example",
    responses((status = 200, description = "Greeting", body = ApiResponse<HelloResponse>))
)]
pub(crate) async fn hello() -> Json<ApiResponse<HelloResponse>> {
    Json(ApiResponse::ok(HelloResponse {
        message: "Hello World".to_string(),
    }))
}

/// Always fails, demonstrating the error envelope.
#[utoipa::path(
    get,
    path = "/example/error",
    tag = "example",
    responses((status = 400, description = "Always a bad request"))
)]
pub(crate) async fn error_demo() -> ApiError {
    ApiError::bad_request("Bad Request")
}

/// Static demo payload.
#[utoipa::path(
    get,
    path = "/example/data",
    tag = "example",
    responses((status = 200, description = "Demo data", body = ApiResponse<DataResponse>))
)]
pub(crate) async fn data() -> Json<ApiResponse<DataResponse>> {
    Json(ApiResponse::ok(DataResponse {
        message: "Hello from bedrock".to_string(),
        data: vec![1, 2, 3, 4, 5],
    }))
}

/// List all stored items.
#[utoipa::path(
    get,
    path = "/example/items",
    tag = "example",
    responses((status = 200, description = "All items", body = ApiResponse<Vec<Item>>))
)]
pub(crate) async fn list_items(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<Item>>> {
    let items = state.items.read().clone();
    Json(ApiResponse::ok(items))
}

/// Fetch a single item by id.
#[utoipa::path(
    get,
    path = "/example/items/{id}",
    tag = "example",
    params(("id" = u64, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item", body = ApiResponse<Item>),
        (status = 404, description = "Unknown id")
    )
)]
pub(crate) async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<Item>>, ApiError> {
    let items = state.items.read();
    items
        .iter()
        .find(|item| item.id == id)
        .cloned()
        .map(|item| Json(ApiResponse::ok(item)))
        .ok_or_else(|| ApiError::not_found("Item not found"))
}

/// Store a new item.
#[utoipa::path(
    post,
    path = "/example/items",
    tag = "example",
    request_body = Item,
    responses(
        (status = 200, description = "Stored item", body = ApiResponse<Item>),
        (status = 400, description = "Duplicate id")
    )
)]
pub(crate) async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(item): Json<Item>,
) -> Result<Json<ApiResponse<Item>>, ApiError> {
    let mut items = state.items.write();
    if items.iter().any(|existing| existing.id == item.id) {
        return Err(ApiError::bad_request("Item with this ID already exists"));
    }
    items.push(item.clone());
    tracing::info!(target: "bedrock::example", id = item.id, "✔ item created");
    Ok(Json(ApiResponse::ok(item)))
}

/// Replace an existing item.
#[utoipa::path(
    put,
    path = "/example/items/{id}",
    tag = "example",
    params(("id" = u64, Path, description = "Item id")),
    request_body = Item,
    responses(
        (status = 200, description = "Updated item", body = ApiResponse<Item>),
        (status = 404, description = "Unknown id")
    )
)]
pub(crate) async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(updated): Json<Item>,
) -> Result<Json<ApiResponse<Item>>, ApiError> {
    let mut items = state.items.write();
    let slot = items
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or_else(|| ApiError::not_found("Item not found"))?;
    *slot = updated.clone();
    tracing::info!(target: "bedrock::example", id, "✔ item updated");
    Ok(Json(ApiResponse::ok(updated)))
}

/// Delete an item, returning the removed value.
#[utoipa::path(
    delete,
    path = "/example/items/{id}",
    tag = "example",
    params(("id" = u64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Removed item", body = ApiResponse<Item>),
        (status = 404, description = "Unknown id")
    )
)]
pub(crate) async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<ApiResponse<Item>>, ApiError> {
    let mut items = state.items.write();
    let index = items
        .iter()
        .position(|item| item.id == id)
        .ok_or_else(|| ApiError::not_found("Item not found"))?;
    let removed = items.remove(index);
    tracing::info!(target: "bedrock::example", id, "✔ item deleted");
    Ok(Json(ApiResponse::ok(removed)))
}

/// Paged demo listing.
#[utoipa::path(
    get,
    path = "/example/items-paged",
    tag = "example",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of demo items", body = ApiResponse<Vec<Item>>),
        (status = 400, description = "Invalid page window")
    )
)]
pub(crate) async fn items_paged(
    Query(paging): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Item>>>, ApiError> {
    paging.validate()?;

    // Demo data; a real project replaces this with a store query and count.
    let all: Vec<Item> = (1..=200)
        .map(|i| Item {
            id: i,
            name: format!("item-{i}"),
            description: None,
        })
        .collect();
    let total = all.len();
    let page: Vec<Item> = all
        .into_iter()
        .skip(paging.offset())
        .take(paging.page_size)
        .collect();

    Ok(Json(ApiResponse::with_meta(page, paging.to_meta(total))))
}

/// The authenticated user's profile.
#[utoipa::path(
    get,
    path = "/example/secure/profile",
    tag = "example",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Authenticated user", body = ApiResponse<User>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub(crate) async fn profile(CurrentUser(user): CurrentUser) -> Json<ApiResponse<User>> {
    Json(ApiResponse::ok(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let state = Arc::new(AppState::new(Config::default()));
        Router::new()
            .nest("/example", router())
            .with_state(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_hello() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/example/hello")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["message"], "Hello World");
    }

    #[tokio::test]
    async fn test_error_demo() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/example/error")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "E_BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_items_crud_roundtrip() {
        let app = test_router();

        let create = Request::builder()
            .method(Method::POST)
            .uri("/example/items")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"id": 1, "name": "first"}"#))
            .unwrap();
        let response = app.clone().oneshot(create).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let duplicate = Request::builder()
            .method(Method::POST)
            .uri("/example/items")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"id": 1, "name": "dup"}"#))
            .unwrap();
        let response = app.clone().oneshot(duplicate).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/example/items/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["name"], "first");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/example/items/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/example/items/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method(Method::PUT)
                    .uri("/example/items/99")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"id": 99, "name": "ghost"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["code"], "E_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_items_paged_meta() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/example/items-paged?page=2&page_size=50")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["meta"]["total"], 200);
        assert_eq!(json["meta"]["page"], 2);
        assert_eq!(json["meta"]["has_next"], true);
        assert_eq!(json["data"][0]["id"], 51);
        assert_eq!(json["data"].as_array().unwrap().len(), 50);
    }

    #[tokio::test]
    async fn test_items_paged_rejects_bad_window() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/example/items-paged?page=0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "E_VALIDATION");
    }

    #[tokio::test]
    async fn test_profile_requires_token() {
        let app = test_router();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/example/secure/profile")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/example/secure/profile")
                    .header(header::AUTHORIZATION, "Bearer demo-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["username"], "demo");
    }
}
