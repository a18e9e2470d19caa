//! Create `listing` table.
//! Stores hotel records owned by a single host; the two array columns
//! (facilities, image URLs) are kept as JSON to preserve insertion order.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listing::Table)
                    .if_not_exists()
                    .col(uuid(Listing::Id).primary_key())
                    .col(uuid(Listing::OwnerId).not_null())
                    .col(string_len(Listing::Name, 256).not_null())
                    .col(string_len(Listing::City, 128).not_null())
                    .col(string_len(Listing::Country, 128).not_null())
                    .col(text(Listing::Description).not_null())
                    .col(string_len(Listing::Kind, 64).not_null())
                    .col(double(Listing::PricePerNight).not_null())
                    .col(json(Listing::Facilities).not_null())
                    .col(json(Listing::ImageUrls).not_null())
                    .col(timestamp_with_time_zone(Listing::LastUpdated).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Listing::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Listing {
    Table,
    Id,
    OwnerId,
    Name,
    City,
    Country,
    Description,
    Kind,
    PricePerNight,
    Facilities,
    ImageUrls,
    LastUpdated,
}
