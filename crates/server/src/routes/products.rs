use axum::{extract::{Path, Query, State}, Extension, Json};
use serde_json::json;

use common::types::StatusResponse;
use models::product::{self, NewProduct, ProductChanges};
use service::pagination::Pagination;
use service::product::ProductDetail;

use super::auth::CurrentUser;
use crate::errors::ApiError;
use crate::state::ServerState;

#[utoipa::path(post, path = "/products", tag = "products", security(("bearer" = [])), request_body = crate::openapi::ProductRequest, responses((status = 200, description = "Created"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Json(input): Json<NewProduct>,
) -> Result<Json<StatusResponse<product::Model>>, ApiError> {
    let created = state.products.create(&caller, input).await?;
    Ok(Json(StatusResponse::ok(created)))
}

#[utoipa::path(get, path = "/products", tag = "products", params(("page" = Option<u32>, Query, description = "1-based page"), ("per_page" = Option<u32>, Query, description = "Items per page (<=100)")), responses((status = 200, description = "Products")))]
pub async fn list(State(state): State<ServerState>, Query(page): Query<Pagination>) -> Result<Json<StatusResponse<Vec<product::Model>>>, ApiError> {
    Ok(Json(StatusResponse::ok(state.products.list(page).await?)))
}

#[utoipa::path(get, path = "/products/{id}", tag = "products", params(("id" = i32, Path, description = "Product id")), responses((status = 200, description = "Product with business"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<StatusResponse<ProductDetail>>, ApiError> {
    Ok(Json(StatusResponse::ok(state.products.detail(id).await?)))
}

#[utoipa::path(put, path = "/products/{id}", tag = "products", security(("bearer" = [])), params(("id" = i32, Path, description = "Product id")), request_body = crate::openapi::ProductUpdateRequest, responses((status = 200, description = "Updated"), (status = 401, description = "Not the owner"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(changes): Json<ProductChanges>,
) -> Result<Json<StatusResponse<product::Model>>, ApiError> {
    let updated = state.products.update(&caller, id, changes).await?;
    Ok(Json(StatusResponse::ok(updated)))
}

#[utoipa::path(delete, path = "/products/{id}", tag = "products", security(("bearer" = [])), params(("id" = i32, Path, description = "Product id")), responses((status = 200, description = "Deleted"), (status = 401, description = "Not the owner"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.products.delete(&caller, id).await?;
    Ok(Json(json!({ "status": "ok" })))
}
