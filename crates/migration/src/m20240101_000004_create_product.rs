//! Create `product` table with FK to `business`.
//!
//! Prices are decimal(10,2); `percentage_discount` is stored, not computed by the database.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(pk_auto(Product::Id))
                    .col(string_len(Product::Name, 100).unique_key().not_null())
                    .col(string_len(Product::Category, 100).default("Unspecified").not_null())
                    .col(text(Product::Description).not_null())
                    .col(decimal_len(Product::OriginalPrice, 10, 2).default(0).not_null())
                    .col(decimal_len(Product::CurrentPrice, 10, 2).default(0).not_null())
                    .col(decimal_len(Product::PercentageDiscount, 10, 2).default(0).not_null())
                    .col(date(Product::OfferExpirationDate).default(Expr::current_date()).not_null())
                    .col(integer(Product::BusinessId).not_null())
                    .col(
                        ColumnDef::new(Product::FeaturedImage)
                            .string_len(255)
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_business")
                            .from(Product::Table, Product::BusinessId)
                            .to(Business::Table, Business::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    Name,
    Category,
    Description,
    OriginalPrice,
    CurrentPrice,
    PercentageDiscount,
    OfferExpirationDate,
    BusinessId,
    FeaturedImage,
}

#[derive(DeriveIden)]
enum Business { Table, Id }
