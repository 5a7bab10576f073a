use async_trait::async_trait;
use models::errors::ModelError;
use models::product::{self, NewProduct, ProductChanges};
use models::product_image;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create_product(&self, business_id: i32, input: NewProduct) -> Result<product::Model, ModelError>;
    async fn find_product(&self, id: i32) -> Result<Option<product::Model>, ModelError>;
    /// `page_idx` is 0-based.
    async fn list_products(&self, page_idx: u64, per_page: u64) -> Result<Vec<product::Model>, ModelError>;
    async fn update_product(&self, id: i32, changes: ProductChanges) -> Result<product::Model, ModelError>;
    async fn delete_product(&self, id: i32) -> Result<bool, ModelError>;
    async fn attach_image(&self, product_id: i32, filename: &str) -> Result<product_image::Model, ModelError>;
    async fn product_images(&self, product: &product::Model) -> Result<Vec<product_image::Model>, ModelError>;
}
