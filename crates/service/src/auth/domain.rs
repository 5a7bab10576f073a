use serde::{Deserialize, Serialize};

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login input, submitted as a form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Issued bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

impl AccessToken {
    pub fn bearer(access_token: String) -> Self {
        Self { access_token, token_type: "bearer".into() }
    }
}

/// What a token may be used for. A verification link is not a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    Access,
    Verification,
}

/// Claims carried by every token this service issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
    pub purpose: TokenPurpose,
}

/// Result of following a verification link.
#[derive(Debug, Clone)]
pub enum Verification {
    Verified(models::user::Model),
    AlreadyVerified(models::user::Model),
}

pub fn welcome_message(username: &str) -> String {
    format!(
        "Hello {username}, welcome to the Bee store. Please click on the link sent to your registered email address to verify your account and continuing shopping."
    )
}
