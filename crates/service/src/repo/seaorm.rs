use async_trait::async_trait;
use models::business::{self, BusinessChanges};
use models::errors::ModelError;
use models::product::{self, NewProduct, ProductChanges};
use models::{product_image, user};
use sea_orm::DatabaseConnection;

use crate::auth::repository::UserRepository;
use crate::business::repository::BusinessRepository;
use crate::product::repository::ProductRepository;

/// One pooled connection serving every repository.
#[derive(Clone)]
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl UserRepository for SeaOrmStore {
    async fn find_user_by_id(&self, id: i32) -> Result<Option<user::Model>, ModelError> {
        user::find_by_id(&self.db, id).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<user::Model>, ModelError> {
        user::find_by_username(&self.db, username).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<user::Model>, ModelError> {
        user::find_by_email(&self.db, email).await
    }

    async fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<user::Model, ModelError> {
        user::create(&self.db, username, email, password_hash).await
    }

    async fn mark_verified(&self, id: i32) -> Result<user::Model, ModelError> {
        user::mark_verified(&self.db, id).await
    }
}

#[async_trait]
impl BusinessRepository for SeaOrmStore {
    async fn find_business(&self, id: i32) -> Result<Option<business::Model>, ModelError> {
        business::find_by_id(&self.db, id).await
    }

    async fn find_business_by_owner(&self, owner_id: i32) -> Result<Option<business::Model>, ModelError> {
        business::find_by_owner(&self.db, owner_id).await
    }

    async fn update_business(&self, id: i32, changes: BusinessChanges) -> Result<business::Model, ModelError> {
        business::update(&self.db, id, changes).await
    }
}

#[async_trait]
impl ProductRepository for SeaOrmStore {
    async fn create_product(&self, business_id: i32, input: NewProduct) -> Result<product::Model, ModelError> {
        product::create(&self.db, business_id, input).await
    }

    async fn find_product(&self, id: i32) -> Result<Option<product::Model>, ModelError> {
        product::find_by_id(&self.db, id).await
    }

    async fn list_products(&self, page_idx: u64, per_page: u64) -> Result<Vec<product::Model>, ModelError> {
        product::list_page(&self.db, page_idx, per_page).await
    }

    async fn update_product(&self, id: i32, changes: ProductChanges) -> Result<product::Model, ModelError> {
        product::update(&self.db, id, changes).await
    }

    async fn delete_product(&self, id: i32) -> Result<bool, ModelError> {
        product::delete(&self.db, id).await
    }

    async fn attach_image(&self, product_id: i32, filename: &str) -> Result<product_image::Model, ModelError> {
        product::attach_image(&self.db, product_id, filename).await
    }

    async fn product_images(&self, product: &product::Model) -> Result<Vec<product_image::Model>, ModelError> {
        product::images(&self.db, product).await
    }
}
