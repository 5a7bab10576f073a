use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::domain::{Claims, TokenPurpose};
use super::errors::AuthError;

/// HS256 issuer/validator for access and verification tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    verification_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, access_ttl: Duration, verification_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            verification_ttl,
        }
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> Self {
        Self::new(
            &cfg.jwt_secret,
            Duration::minutes(cfg.access_token_ttl_minutes),
            Duration::hours(cfg.verification_token_ttl_hours),
        )
    }

    pub fn issue(&self, user: &models::user::Model) -> Result<String, AuthError> {
        self.issue_with_ttl(user, TokenPurpose::Access, self.access_ttl)
    }

    pub fn issue_verification(&self, user: &models::user::Model) -> Result<String, AuthError> {
        self.issue_with_ttl(user, TokenPurpose::Verification, self.verification_ttl)
    }

    pub(crate) fn issue_with_ttl(&self, user: &models::user::Model, purpose: TokenPurpose, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            id: user.id,
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            purpose,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Verify signature, algorithm and expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }

    /// `decode`, then reject tokens minted for another purpose.
    pub fn decode_for(&self, token: &str, purpose: TokenPurpose) -> Result<Claims, AuthError> {
        let claims = self.decode(token)?;
        if claims.purpose != purpose {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }
}
