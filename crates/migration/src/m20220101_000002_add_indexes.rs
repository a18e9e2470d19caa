//! Owner lookup index. Every read/update/delete is filtered by owner,
//! so the listing table gets a dedicated index on `owner_id`.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_listing_owner")
                    .table(Listing::Table)
                    .col(Listing::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_listing_owner").table(Listing::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Listing {
    Table,
    OwnerId,
}
