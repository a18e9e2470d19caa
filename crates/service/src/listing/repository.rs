use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::listing::domain::{ListingPatch, NewListing};

/// Persistence seam for listings. Every operation except `create` takes
/// the requesting owner and filters on it, so a caller can never reach
/// another host's records through this trait.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn create(&self, new: NewListing) -> Result<models::listing::Model, ServiceError>;
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<models::listing::Model>, ServiceError>;
    async fn find_by_owner(&self, id: Uuid, owner_id: Uuid) -> Result<Option<models::listing::Model>, ServiceError>;
    async fn update_by_owner(&self, id: Uuid, owner_id: Uuid, patch: ListingPatch) -> Result<Option<models::listing::Model>, ServiceError>;
    async fn delete_all_by_owner(&self, owner_id: Uuid) -> Result<u64, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmListingRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ListingRepository for SeaOrmListingRepository {
    async fn create(&self, new: NewListing) -> Result<models::listing::Model, ServiceError> {
        crate::db::listing_store::create_listing(&self.db, new).await
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<models::listing::Model>, ServiceError> {
        crate::db::listing_store::list_by_owner(&self.db, owner_id).await
    }

    async fn find_by_owner(&self, id: Uuid, owner_id: Uuid) -> Result<Option<models::listing::Model>, ServiceError> {
        crate::db::listing_store::find_by_owner(&self.db, id, owner_id).await
    }

    async fn update_by_owner(&self, id: Uuid, owner_id: Uuid, patch: ListingPatch) -> Result<Option<models::listing::Model>, ServiceError> {
        crate::db::listing_store::update_by_owner(&self.db, id, owner_id, patch).await
    }

    async fn delete_all_by_owner(&self, owner_id: Uuid) -> Result<u64, ServiceError> {
        crate::db::listing_store::delete_all_by_owner(&self.db, owner_id).await
    }
}
