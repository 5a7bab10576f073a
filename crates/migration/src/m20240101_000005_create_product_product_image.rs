//! Create `product_product_image` join table (product <-> product_image, many-to-many).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductProductImage::Table)
                    .if_not_exists()
                    .col(integer(ProductProductImage::ProductId).not_null())
                    .col(integer(ProductProductImage::ProductImageId).not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_product_product_image")
                            .col(ProductProductImage::ProductId)
                            .col(ProductProductImage::ProductImageId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ppi_product")
                            .from(ProductProductImage::Table, ProductProductImage::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ppi_product_image")
                            .from(ProductProductImage::Table, ProductProductImage::ProductImageId)
                            .to(ProductImage::Table, ProductImage::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductProductImage::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProductProductImage { Table, ProductId, ProductImageId }

#[derive(DeriveIden)]
enum Product { Table, Id }

#[derive(DeriveIden)]
enum ProductImage { Table, Id }
