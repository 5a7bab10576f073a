use models::errors::ModelError;
use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Incorrect username or password")]
    InvalidCredentials,
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("User not found")]
    UserNotFound,
    #[error("Not authenticated to perform this action")]
    NotOwner,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Conflict(_) => 1002,
            AuthError::UserNotFound => 1003,
            AuthError::InvalidCredentials => 1004,
            AuthError::MissingToken => 1005,
            AuthError::TokenExpired => 1006,
            AuthError::InvalidToken => 1007,
            AuthError::NotOwner => 1008,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }

    /// True for failures that must be answered with 401 and a bearer challenge.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::MissingToken
                | AuthError::TokenExpired
                | AuthError::InvalidToken
                | AuthError::UserNotFound
                | AuthError::NotOwner
        )
    }
}

impl From<ModelError> for AuthError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(msg) => AuthError::Validation(msg),
            ModelError::Conflict(msg) => AuthError::Conflict(msg),
            ModelError::NotFound(_) => AuthError::UserNotFound,
            ModelError::Db(msg) => AuthError::Repository(msg),
        }
    }
}
