//! Create `business` table with FK to `user`.
//!
//! One row per user, removed together with its owner.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Business::Table)
                    .if_not_exists()
                    .col(pk_auto(Business::Id))
                    .col(string_len(Business::Name, 100).unique_key().not_null())
                    .col(string_len(Business::City, 100).default("Unspecified").not_null())
                    .col(string_len(Business::Region, 100).default("Unspecified").not_null())
                    .col(text(Business::Description).default("Unspecified").not_null())
                    .col(string_len(Business::Logo, 255).default("default.jpg").not_null())
                    .col(integer(Business::OwnerId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_owner")
                            .from(Business::Table, Business::OwnerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Business::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Business { Table, Id, Name, City, Region, Description, Logo, OwnerId }

#[derive(DeriveIden)]
enum User { Table, Id }
