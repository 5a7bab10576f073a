use async_trait::async_trait;
use models::business::{self, BusinessChanges};
use models::errors::ModelError;

#[async_trait]
pub trait BusinessRepository: Send + Sync {
    async fn find_business(&self, id: i32) -> Result<Option<business::Model>, ModelError>;
    async fn find_business_by_owner(&self, owner_id: i32) -> Result<Option<business::Model>, ModelError>;
    async fn update_business(&self, id: i32, changes: BusinessChanges) -> Result<business::Model, ModelError>;
}
