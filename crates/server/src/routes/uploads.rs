use axum::{extract::{Multipart, Path, State}, Extension, Json};
use serde_json::json;

use super::auth::CurrentUser;
use crate::errors::ApiError;
use crate::observability::UPLOADS_TOTAL;
use crate::state::ServerState;

/// First multipart field named `file`: `(file name, bytes)`.
async fn read_file_field(mut multipart: Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest(e.body_text()))?;
        return Ok((filename, bytes.to_vec()));
    }
    Err(ApiError::BadRequest("missing multipart field `file`".into()))
}

#[utoipa::path(post, path = "/uploadfile/profile", tag = "uploads", security(("bearer" = [])), request_body(content = crate::openapi::UploadRequest, content_type = "multipart/form-data"), responses((status = 200, description = "Logo stored"), (status = 400, description = "File extension not allowed")))]
pub async fn profile(
    State(state): State<ServerState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (filename, bytes) = read_file_field(multipart).await?;
    let url = state.businesses.upload_logo(&caller, &filename, bytes).await?;
    UPLOADS_TOTAL.inc();
    Ok(Json(json!({ "status": "ok", "filename": url })))
}

#[utoipa::path(post, path = "/uploadfile/product/{id}", tag = "uploads", security(("bearer" = [])), params(("id" = i32, Path, description = "Product id")), request_body(content = crate::openapi::UploadRequest, content_type = "multipart/form-data"), responses((status = 200, description = "Image stored"), (status = 400, description = "File extension not allowed"), (status = 401, description = "Not the owner")))]
pub async fn product(
    State(state): State<ServerState>,
    Extension(CurrentUser(caller)): Extension<CurrentUser>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (filename, bytes) = read_file_field(multipart).await?;
    let url = state.products.upload_image(&caller, id, &filename, bytes).await?;
    UPLOADS_TOTAL.inc();
    Ok(Json(json!({ "status": "ok", "filename": url })))
}
