use sea_orm::{entity::prelude::*, DatabaseConnection, NotSet, Set, TransactionTrait};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};
use crate::business;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string, never the plain password.
    #[serde(skip_serializing)]
    pub password: String,
    pub is_verified: bool,
    pub join_date: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Business,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Business => Entity::has_one(business::Entity).into() }
    }
}

impl Related<business::Entity> for Entity {
    fn to() -> RelationDef { Relation::Business.def() }
}

/// Every inserted user gets its business on the same connection, so inside a
/// transaction both rows commit or neither does.
#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn after_save<C>(model: Model, db: &C, insert: bool) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            let created = business::create_for_owner(db, &model).await?;
            tracing::debug!(user_id = model.id, business_id = created.id, "business_created_for_user");
        }
        Ok(model)
    }
}

pub fn validate_username(username: &str) -> Result<(), errors::ModelError> {
    let trimmed = username.trim();
    if trimmed.is_empty() { return Err(ModelError::Validation("username required".into())); }
    if trimmed.chars().count() > 100 { return Err(ModelError::Validation("username too long (<=100)".into())); }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let trimmed = email.trim();
    if !trimmed.contains('@') || trimmed.starts_with('@') || trimmed.ends_with('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    if trimmed.chars().count() > 100 { return Err(ModelError::Validation("email too long (<=100)".into())); }
    Ok(())
}

/// Insert a user (and, through the save hook, its business) in one transaction.
pub async fn create(db: &DatabaseConnection, username: &str, email: &str, password_hash: &str) -> Result<Model, errors::ModelError> {
    validate_username(username)?;
    validate_email(email)?;
    if password_hash.trim().is_empty() { return Err(ModelError::Validation("password hash required".into())); }

    let txn = db.begin().await.map_err(ModelError::from_db)?;
    let am = ActiveModel {
        id: NotSet,
        username: Set(username.trim().to_string()),
        email: Set(email.trim().to_string()),
        password: Set(password_hash.to_string()),
        is_verified: Set(false),
        join_date: Set(Utc::now().into()),
    };
    let created = am.insert(&txn).await.map_err(ModelError::from_db)?;
    txn.commit().await.map_err(ModelError::from_db)?;
    Ok(created)
}

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(ModelError::from_db)
}

pub async fn find_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Username.eq(username.trim()))
        .one(db)
        .await
        .map_err(ModelError::from_db)
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Email.eq(email.trim()))
        .one(db)
        .await
        .map_err(ModelError::from_db)
}

/// Flip `is_verified`; the only mutation a user row ever sees.
pub async fn mark_verified(db: &DatabaseConnection, id: i32) -> Result<Model, errors::ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ModelError::from_db)?
        .ok_or_else(|| ModelError::not_found("user"))?
        .into();
    found.is_verified = Set(true);
    found.update(db).await.map_err(ModelError::from_db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user_row() -> Model {
        Model {
            id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "$argon2id$v=19$stub".into(),
            is_verified: false,
            join_date: Utc::now().into(),
        }
    }

    fn business_row() -> business::Model {
        business::Model {
            id: 7,
            name: "Business by alice".into(),
            city: "Unspecified".into(),
            region: "Unspecified".into(),
            description: "Unspecified".into(),
            logo: "default.jpg".into(),
            owner_id: 1,
        }
    }

    #[test]
    fn validates_username_and_email() {
        assert!(validate_username("  ").is_err());
        assert!(validate_username(&"x".repeat(101)).is_err());
        assert!(validate_username("bee").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("bee@example.com").is_ok());
    }

    #[test]
    fn password_is_never_serialized() {
        let json = serde_json::to_value(user_row()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[tokio::test]
    async fn creating_a_user_inserts_its_business_in_the_same_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user_row()]])
            .append_query_results([vec![business_row()]])
            .into_connection();

        let created = create(&db, "alice", "alice@example.com", "$argon2id$v=19$stub").await.unwrap();
        assert_eq!(created.id, 1);

        let log = format!("{:?}", db.into_transaction_log()).replace("\\\"", "\"");
        assert!(log.contains(r#"INSERT INTO "user""#), "{log}");
        assert!(log.contains(r#"INSERT INTO "business""#), "{log}");
        assert!(log.find(r#"INSERT INTO "user""#) < log.find(r#"INSERT INTO "business""#));
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = create(&db, "", "alice@example.com", "hash").await.unwrap_err();
        assert!(matches!(err, ModelError::Validation(_)));
        assert!(db.into_transaction_log().is_empty());
    }
}
