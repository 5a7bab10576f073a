use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{product, product_product_image};

pub const DEFAULT_IMAGE: &str = "productDefault.jpg";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub image: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef { product_product_image::Relation::Product.def() }
    fn via() -> Option<RelationDef> { Some(product_product_image::Relation::ProductImage.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}
