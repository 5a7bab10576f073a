use sea_orm::{entity::prelude::*, DatabaseConnection, NotSet, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::{product, user};

pub const UNSPECIFIED: &str = "Unspecified";
pub const DEFAULT_LOGO: &str = "default.jpg";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "business")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub city: String,
    pub region: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub logo: String,
    pub owner_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Owner,
    Products,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(user::Entity)
                .from(Column::OwnerId)
                .to(user::Column::Id)
                .into(),
            Relation::Products => Entity::has_many(product::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Owner.def() }
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Products.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Partial update; `None` leaves the column untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BusinessChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
}

impl BusinessChanges {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        for (field, value) in [("name", &self.name), ("city", &self.city), ("region", &self.region)] {
            if let Some(v) = value {
                if v.trim().is_empty() { return Err(ModelError::Validation(format!("{field} must not be empty"))); }
                if v.chars().count() > 100 { return Err(ModelError::Validation(format!("{field} too long (<=100)"))); }
            }
        }
        Ok(())
    }
}

pub fn default_name(username: &str) -> String {
    format!("Business by {username}")
}

/// Insert the default business for a freshly created user. Generic over the
/// connection so the user save hook can run it inside the caller's transaction.
pub async fn create_for_owner<C>(db: &C, owner: &user::Model) -> Result<Model, DbErr>
where
    C: ConnectionTrait,
{
    let am = ActiveModel {
        id: NotSet,
        name: Set(default_name(&owner.username)),
        city: Set(UNSPECIFIED.into()),
        region: Set(UNSPECIFIED.into()),
        description: Set(UNSPECIFIED.into()),
        logo: Set(DEFAULT_LOGO.into()),
        owner_id: Set(owner.id),
    };
    am.insert(db).await
}

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(ModelError::from_db)
}

pub async fn find_by_owner(db: &DatabaseConnection, owner_id: i32) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::OwnerId.eq(owner_id))
        .one(db)
        .await
        .map_err(ModelError::from_db)
}

pub async fn update(db: &DatabaseConnection, id: i32, changes: BusinessChanges) -> Result<Model, errors::ModelError> {
    changes.validate()?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ModelError::from_db)?
        .ok_or_else(|| ModelError::not_found("business"))?
        .into();
    if let Some(name) = changes.name { am.name = Set(name.trim().to_string()); }
    if let Some(city) = changes.city { am.city = Set(city.trim().to_string()); }
    if let Some(region) = changes.region { am.region = Set(region.trim().to_string()); }
    if let Some(description) = changes.description { am.description = Set(description); }
    if let Some(logo) = changes.logo { am.logo = Set(logo); }
    am.update(db).await.map_err(ModelError::from_db)
}
