use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::listing::domain::{ListingPatch, NewListing};
use crate::listing::repository::ListingRepository;

/// In-process repository used by tests and local development. Tracks how
/// many repository calls were made so tests can assert that validation
/// failures never reach persistence.
#[derive(Default)]
pub struct InMemoryListingRepository {
    rows: RwLock<HashMap<Uuid, models::listing::Model>>,
    calls: AtomicUsize,
}

impl InMemoryListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total repository invocations, any operation.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn create(&self, new: NewListing) -> Result<models::listing::Model, ServiceError> {
        self.touch();
        let model = models::listing::Model {
            id: Uuid::new_v4(),
            owner_id: new.owner_id,
            name: new.name,
            city: new.city,
            country: new.country,
            description: new.description,
            kind: new.kind,
            price_per_night: new.price_per_night,
            facilities: new.facilities.into(),
            image_urls: new.image_urls.into(),
            last_updated: new.last_updated,
        };
        self.rows.write().await.insert(model.id, model.clone());
        Ok(model)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<models::listing::Model>, ServiceError> {
        self.touch();
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|m| m.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_by_owner(&self, id: Uuid, owner_id: Uuid) -> Result<Option<models::listing::Model>, ServiceError> {
        self.touch();
        Ok(self
            .rows
            .read()
            .await
            .get(&id)
            .filter(|m| m.owner_id == owner_id)
            .cloned())
    }

    async fn update_by_owner(&self, id: Uuid, owner_id: Uuid, patch: ListingPatch) -> Result<Option<models::listing::Model>, ServiceError> {
        self.touch();
        let mut rows = self.rows.write().await;
        let Some(model) = rows.get_mut(&id).filter(|m| m.owner_id == owner_id) else {
            return Ok(None);
        };
        model.name = patch.name;
        model.city = patch.city;
        model.country = patch.country;
        model.description = patch.description;
        model.kind = patch.kind;
        model.price_per_night = patch.price_per_night;
        model.facilities = patch.facilities.into();
        model.image_urls = patch.image_urls.into();
        model.last_updated = patch.last_updated;
        Ok(Some(model.clone()))
    }

    async fn delete_all_by_owner(&self, owner_id: Uuid) -> Result<u64, ServiceError> {
        self.touch();
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, m| m.owner_id != owner_id);
        Ok((before - rows.len()) as u64)
    }
}
