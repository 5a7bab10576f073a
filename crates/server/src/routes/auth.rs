use axum::{
    extract::{Query, Request, State},
    http::header,
    middleware::Next,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use models::user;
use serde::Deserialize;
use serde_json::json;

use common::types::Message;
use service::auth::domain::{welcome_message, AccessToken, LoginInput, RegisterInput, Verification};
use service::auth::errors::AuthError;

use crate::errors::ApiError;
use crate::observability::{LOGINS_TOTAL, REGISTRATIONS_TOTAL};
use crate::state::ServerState;

/// The authenticated caller, placed in request extensions by the bearer middleware.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub user::Model);

#[utoipa::path(post, path = "/registration", tag = "auth", request_body = crate::openapi::RegistrationRequest, responses((status = 200, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn registration(State(state): State<ServerState>, Json(input): Json<RegisterInput>) -> Result<Json<serde_json::Value>, ApiError> {
    let user = state.auth.register(input).await?;
    REGISTRATIONS_TOTAL.inc();
    Ok(Json(json!({ "status": "ok", "user": welcome_message(&user.username) })))
}

#[utoipa::path(post, path = "/token", tag = "auth", request_body(content = crate::openapi::TokenRequest, content_type = "application/x-www-form-urlencoded"), responses((status = 200, description = "Access token", body = crate::openapi::TokenResponse), (status = 401, description = "Unauthorized")))]
pub async fn token(State(state): State<ServerState>, Form(input): Form<LoginInput>) -> Result<Json<AccessToken>, ApiError> {
    let token = state.auth.login(input).await?;
    LOGINS_TOTAL.inc();
    Ok(Json(token))
}

#[derive(Debug, Deserialize)]
pub struct VerificationQuery {
    pub token: String,
}

#[utoipa::path(get, path = "/verification", tag = "auth", params(("token" = String, Query, description = "Verification token")), responses((status = 200, description = "Verification page"), (status = 401, description = "Unauthorized")))]
pub async fn verification(State(state): State<ServerState>, Query(q): Query<VerificationQuery>) -> Result<Response, ApiError> {
    match state.auth.verify_email(&q.token).await? {
        Verification::Verified(user) => Ok(Html(verified_page(&user.username)).into_response()),
        Verification::AlreadyVerified(_) => Ok(Json(Message { message: "Email verification error".into() }).into_response()),
    }
}

fn verified_page(username: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head><meta charset="UTF-8"><title>Account verified</title></head>
  <body>
    <div style="display: flex; align-items: center; justify-content: center; flex-direction: column">
      <h3>Hello {username}, your account has been verified.</h3>
      <p>Thanks for choosing The Bee Store. You can now log in and continue shopping.</p>
    </div>
  </body>
</html>"#,
        username = escape_html(username)
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn bearer_token(req: &Request) -> Result<String, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;
    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => {
            tracing::warn!(path = %req.uri().path(), "invalid Authorization format (expect Bearer)");
            Err(AuthError::InvalidToken)
        }
    }
}

/// Validate `Authorization: Bearer <token>`, load the caller and hand it to the handler.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req)?;
    let caller = state.auth.authenticate(&token).await.map_err(|e| {
        tracing::warn!(path = %req.uri().path(), err = %e, "token validation failed");
        e
    })?;
    req.extensions_mut().insert(CurrentUser(caller));
    Ok(next.run(req).await)
}
