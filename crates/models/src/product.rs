use sea_orm::{entity::prelude::*, DatabaseConnection, NotSet, PaginatorTrait, QueryOrder, Set, TransactionTrait};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::{business, product_image, product_product_image};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub category: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub original_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub current_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub percentage_discount: Decimal,
    pub offer_expiration_date: Date,
    pub business_id: i32,
    pub featured_image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Business,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Business => Entity::belongs_to(business::Entity)
                .from(Column::BusinessId)
                .to(business::Column::Id)
                .into(),
        }
    }
}

impl Related<business::Entity> for Entity {
    fn to() -> RelationDef { Relation::Business.def() }
}

impl Related<product_image::Entity> for Entity {
    fn to() -> RelationDef { product_product_image::Relation::ProductImage.def() }
    fn via() -> Option<RelationDef> { Some(product_product_image::Relation::Product.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted when creating a product. The owning business and the
/// discount are filled in by `create`.
#[derive(Clone, Debug, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
    pub original_price: Decimal,
    pub current_price: Decimal,
    #[serde(default)]
    pub offer_expiration_date: Option<NaiveDate>,
}

/// Partial update. No `percentage_discount`: it is fixed at creation.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub original_price: Option<Decimal>,
    pub current_price: Option<Decimal>,
    pub offer_expiration_date: Option<NaiveDate>,
}

/// Prices are stored as `decimal(10, 2)`.
const PRICE_SCALE: u32 = 2;
const PRICE_LIMIT: i64 = 100_000_000;

/// `(original - current) / original * 100`, rounded to the column's two decimals.
pub fn percentage_discount(original_price: Decimal, current_price: Decimal) -> Result<Decimal, errors::ModelError> {
    if original_price <= Decimal::ZERO {
        return Err(ModelError::Validation("original_price must be greater than zero".into()));
    }
    original_price
        .checked_sub(current_price)
        .and_then(|diff| diff.checked_div(original_price))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp(PRICE_SCALE))
        .ok_or_else(|| ModelError::Validation("price out of range".into()))
}

/// Round to the column scale and reject what the column cannot hold.
fn stored_price(field: &str, price: Decimal) -> Result<Decimal, errors::ModelError> {
    let rounded = price.round_dp(PRICE_SCALE);
    if rounded < Decimal::ZERO {
        return Err(ModelError::Validation(format!("{field} must not be negative")));
    }
    if rounded >= Decimal::from(PRICE_LIMIT) {
        return Err(ModelError::Validation(format!("{field} must be below {PRICE_LIMIT}")));
    }
    Ok(rounded)
}

fn stored_original_price(price: Decimal) -> Result<Decimal, errors::ModelError> {
    let rounded = stored_price("original_price", price)?;
    if rounded <= Decimal::ZERO {
        return Err(ModelError::Validation("original_price must be greater than zero".into()));
    }
    Ok(rounded)
}

/// Prices exactly as they are written to the row, with the discount derived
/// from the rounded pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pricing {
    pub original_price: Decimal,
    pub current_price: Decimal,
    pub percentage_discount: Decimal,
}

impl Pricing {
    pub fn new(original_price: Decimal, current_price: Decimal) -> Result<Self, errors::ModelError> {
        let original_price = stored_original_price(original_price)?;
        let current_price = stored_price("current_price", current_price)?;
        let percentage_discount = percentage_discount(original_price, current_price)?;
        // the discount shares the price column type
        if percentage_discount.abs() >= Decimal::from(PRICE_LIMIT) {
            return Err(ModelError::Validation("current_price too far above original_price".into()));
        }
        Ok(Self { original_price, current_price, percentage_discount })
    }
}

fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(ModelError::Validation("name required".into())); }
    if name.chars().count() > 100 { return Err(ModelError::Validation("name too long (<=100)".into())); }
    Ok(())
}

impl NewProduct {
    pub fn validate(&self) -> Result<Pricing, errors::ModelError> {
        validate_name(&self.name)?;
        Pricing::new(self.original_price, self.current_price)
    }
}

impl ProductChanges {
    /// Validates and rounds the prices in place.
    pub fn validate(&mut self) -> Result<(), errors::ModelError> {
        if let Some(name) = &self.name { validate_name(name)?; }
        if let Some(price) = self.original_price {
            self.original_price = Some(stored_original_price(price)?);
        }
        if let Some(price) = self.current_price {
            self.current_price = Some(stored_price("current_price", price)?);
        }
        Ok(())
    }
}

pub async fn create(db: &DatabaseConnection, business_id: i32, input: NewProduct) -> Result<Model, errors::ModelError> {
    let pricing = input.validate()?;
    let am = ActiveModel {
        id: NotSet,
        name: Set(input.name.trim().to_string()),
        category: Set(input.category.filter(|c| !c.trim().is_empty()).unwrap_or_else(|| business::UNSPECIFIED.into())),
        description: Set(input.description),
        original_price: Set(pricing.original_price),
        current_price: Set(pricing.current_price),
        percentage_discount: Set(pricing.percentage_discount),
        offer_expiration_date: Set(input.offer_expiration_date.unwrap_or_else(|| Utc::now().date_naive())),
        business_id: Set(business_id),
        featured_image: Set(None),
    };
    am.insert(db).await.map_err(ModelError::from_db)
}

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(ModelError::from_db)
}

/// One page of products ordered by id. `page_idx` is 0-based.
pub async fn list_page(db: &DatabaseConnection, page_idx: u64, per_page: u64) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_asc(Column::Id)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(ModelError::from_db)
}

pub async fn update(db: &DatabaseConnection, id: i32, mut changes: ProductChanges) -> Result<Model, errors::ModelError> {
    changes.validate()?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ModelError::from_db)?
        .ok_or_else(|| ModelError::not_found("product"))?
        .into();
    if let Some(name) = changes.name { am.name = Set(name.trim().to_string()); }
    if let Some(category) = changes.category { am.category = Set(category); }
    if let Some(description) = changes.description { am.description = Set(description); }
    if let Some(price) = changes.original_price { am.original_price = Set(price); }
    if let Some(price) = changes.current_price { am.current_price = Set(price); }
    if let Some(date) = changes.offer_expiration_date { am.offer_expiration_date = Set(date); }
    am.update(db).await.map_err(ModelError::from_db)
}

/// Returns false when nothing was deleted.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await.map_err(ModelError::from_db)?;
    Ok(res.rows_affected > 0)
}

pub async fn images(db: &DatabaseConnection, product: &Model) -> Result<Vec<product_image::Model>, errors::ModelError> {
    product
        .find_related(product_image::Entity)
        .all(db)
        .await
        .map_err(ModelError::from_db)
}

/// Store an image row, link it to the product, and make it the featured image
/// if the product has none yet.
pub async fn attach_image(db: &DatabaseConnection, product_id: i32, filename: &str) -> Result<product_image::Model, errors::ModelError> {
    let txn = db.begin().await.map_err(ModelError::from_db)?;
    let found = Entity::find_by_id(product_id)
        .one(&txn)
        .await
        .map_err(ModelError::from_db)?
        .ok_or_else(|| ModelError::not_found("product"))?;

    let image = product_image::ActiveModel { id: NotSet, image: Set(filename.to_string()) }
        .insert(&txn)
        .await
        .map_err(ModelError::from_db)?;
    product_product_image::ActiveModel { product_id: Set(found.id), product_image_id: Set(image.id) }
        .insert(&txn)
        .await
        .map_err(ModelError::from_db)?;

    if found.featured_image.is_none() {
        let mut am: ActiveModel = found.into();
        am.featured_image = Set(Some(filename.to_string()));
        am.update(&txn).await.map_err(ModelError::from_db)?;
    }
    txn.commit().await.map_err(ModelError::from_db)?;
    Ok(image)
}
