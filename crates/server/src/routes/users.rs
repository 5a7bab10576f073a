use axum::{extract::State, Extension, Json};

use common::types::StatusResponse;
use service::business::Profile;

use super::auth::CurrentUser;
use crate::errors::ApiError;
use crate::state::ServerState;

#[utoipa::path(post, path = "/user/me", tag = "users", security(("bearer" = [])), responses((status = 200, description = "Current user profile"), (status = 401, description = "Unauthorized")))]
pub async fn me(State(state): State<ServerState>, Extension(CurrentUser(caller)): Extension<CurrentUser>) -> Result<Json<StatusResponse<Profile>>, ApiError> {
    let profile = state.businesses.profile(&caller).await?;
    Ok(Json(StatusResponse::ok(profile)))
}
