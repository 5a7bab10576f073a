use axum::{extract::{Path, State}, Extension, Json};

use common::types::StatusResponse;
use models::business::{self, BusinessChanges};

use super::auth::CurrentUser;
use crate::errors::ApiError;
use crate::state::ServerState;

#[utoipa::path(get, path = "/business/{id}", tag = "business", params(("id" = i32, Path, description = "Business id")), responses((status = 200, description = "Business"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<i32>) -> Result<Json<business::Model>, ApiError> {
    Ok(Json(state.businesses.get(id).await?))
}

#[utoipa::path(put, path = "/business/{id}", tag = "business", security(("bearer" = [])), params(("id" = i32, Path, description = "Business id")), request_body = crate::openapi::BusinessUpdateRequest, responses((status = 200, description = "Updated"), (status = 401, description = "Not the owner"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(changes): Json<BusinessChanges>,
) -> Result<Json<StatusResponse<business::Model>>, ApiError> {
    let updated = state.businesses.update(&caller, id, changes).await?;
    Ok(Json(StatusResponse::ok(updated)))
}
