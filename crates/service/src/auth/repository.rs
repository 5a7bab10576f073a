use async_trait::async_trait;
use models::errors::ModelError;
use models::user;

/// Repository abstraction for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_id(&self, id: i32) -> Result<Option<user::Model>, ModelError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<user::Model>, ModelError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<user::Model>, ModelError>;
    /// Insert the user together with its default business.
    async fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<user::Model, ModelError>;
    async fn mark_verified(&self, id: i32) -> Result<user::Model, ModelError>;
}
