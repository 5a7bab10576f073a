use std::sync::Arc;

use models::product::{self, NewProduct, ProductChanges};
use models::{business, product_image, user};
use serde::Serialize;
use tracing::{info, instrument};

use super::repository::ProductRepository;
use crate::access::ensure_owner;
use crate::business::repository::BusinessRepository;
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::storage::{image_store::image_url, ImageStore};

/// Business card shown alongside a product.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessSummary {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub region: String,
    pub logo: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: product::Model,
    pub images: Vec<String>,
    pub business: BusinessSummary,
}

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    businesses: Arc<dyn BusinessRepository>,
    images: Arc<ImageStore>,
    base_url: String,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        businesses: Arc<dyn BusinessRepository>,
        images: Arc<ImageStore>,
        base_url: impl Into<String>,
    ) -> Self {
        Self { products, businesses, images, base_url: base_url.into() }
    }

    /// Create a product under the caller's business.
    #[instrument(skip(self, caller, input), fields(caller_id = caller.id, name = %input.name))]
    pub async fn create(&self, caller: &user::Model, input: NewProduct) -> Result<product::Model, ServiceError> {
        let biz = self.businesses
            .find_business_by_owner(caller.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("business"))?;
        let created = self.products.create_product(biz.id, input).await?;
        info!(product_id = created.id, business_id = biz.id, "product_created");
        Ok(created)
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<product::Model>, ServiceError> {
        let (idx, per_page) = page.normalize();
        Ok(self.products.list_products(idx, per_page).await?)
    }

    pub async fn get(&self, id: i32) -> Result<product::Model, ServiceError> {
        self.products.find_product(id).await?.ok_or_else(|| ServiceError::not_found("product"))
    }

    /// Product with its image URLs and owning business.
    pub async fn detail(&self, id: i32) -> Result<ProductDetail, ServiceError> {
        let found = self.get(id).await?;
        let biz = self.owning_business(&found).await?;
        let images = self.products
            .product_images(&found)
            .await?
            .into_iter()
            .map(|img| image_url(&self.base_url, &img.image))
            .collect();
        Ok(ProductDetail {
            product: found,
            images,
            business: BusinessSummary {
                id: biz.id,
                name: biz.name,
                city: biz.city,
                region: biz.region,
                logo: image_url(&self.base_url, &biz.logo),
            },
        })
    }

    /// Load a product and fail unless `caller` owns its business.
    pub async fn owned_by(&self, caller: &user::Model, id: i32) -> Result<product::Model, ServiceError> {
        let found = self.get(id).await?;
        let biz = self.owning_business(&found).await?;
        ensure_owner(&biz, caller)?;
        Ok(found)
    }

    /// Partial update; the stored discount is left as computed at creation.
    #[instrument(skip(self, caller, changes), fields(caller_id = caller.id))]
    pub async fn update(&self, caller: &user::Model, id: i32, changes: ProductChanges) -> Result<product::Model, ServiceError> {
        let found = self.owned_by(caller, id).await?;
        let updated = self.products.update_product(found.id, changes).await?;
        info!(product_id = updated.id, "product_updated");
        Ok(updated)
    }

    #[instrument(skip(self, caller), fields(caller_id = caller.id))]
    pub async fn delete(&self, caller: &user::Model, id: i32) -> Result<(), ServiceError> {
        let found = self.owned_by(caller, id).await?;
        if !self.products.delete_product(found.id).await? {
            return Err(ServiceError::not_found("product"));
        }
        info!(product_id = found.id, "product_deleted");
        Ok(())
    }

    /// Store an uploaded image for a product the caller owns; returns its public URL.
    #[instrument(skip(self, caller, bytes), fields(caller_id = caller.id, size = bytes.len()))]
    pub async fn upload_image(&self, caller: &user::Model, id: i32, original_name: &str, bytes: Vec<u8>) -> Result<String, ServiceError> {
        let found = self.owned_by(caller, id).await?;
        let filename = self.images.save(original_name, bytes).await?;
        let image: product_image::Model = match self.products.attach_image(found.id, &filename).await {
            Ok(image) => image,
            Err(e) => {
                self.images.remove(&filename).await;
                return Err(e.into());
            }
        };
        info!(product_id = found.id, image_id = image.id, %filename, "product_image_uploaded");
        Ok(image_url(&self.base_url, &filename))
    }

    async fn owning_business(&self, p: &product::Model) -> Result<business::Model, ServiceError> {
        self.businesses
            .find_business(p.business_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("business"))
    }
}
