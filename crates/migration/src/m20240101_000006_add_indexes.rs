use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Business: one per owner
        manager
            .create_index(
                Index::create()
                    .name("uniq_business_owner")
                    .table(Business::Table)
                    .col(Business::OwnerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Product: listing by business
        manager
            .create_index(
                Index::create()
                    .name("idx_product_business")
                    .table(Product::Table)
                    .col(Product::BusinessId)
                    .to_owned(),
            )
            .await?;

        // Join table: reverse lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_ppi_product_image")
                    .table(ProductProductImage::Table)
                    .col(ProductProductImage::ProductImageId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_business_owner").table(Business::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_product_business").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_ppi_product_image").table(ProductProductImage::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Business { Table, OwnerId }

#[derive(DeriveIden)]
enum Product { Table, BusinessId }

#[derive(DeriveIden)]
enum ProductProductImage { Table, ProductImageId }
