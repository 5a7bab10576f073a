//! Create `user` table.
//!
//! Holds login credentials; username and email are unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_len(User::Username, 100).unique_key().not_null())
                    .col(string_len(User::Email, 100).unique_key().not_null())
                    .col(string_len(User::Password, 255).not_null())
                    .col(boolean(User::IsVerified).default(false).not_null())
                    .col(
                        timestamp_with_time_zone(User::JoinDate)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User { Table, Id, Username, Email, Password, IsVerified, JoinDate }
