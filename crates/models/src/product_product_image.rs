//! Join table between products and their images.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{product, product_image};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_product_image")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_image_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Product,
    ProductImage,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Product => Entity::belongs_to(product::Entity)
                .from(Column::ProductId)
                .to(product::Column::Id)
                .into(),
            Relation::ProductImage => Entity::belongs_to(product_image::Entity)
                .from(Column::ProductImageId)
                .to(product_image::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
