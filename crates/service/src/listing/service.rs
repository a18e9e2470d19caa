use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::listing::domain::{ListingForm, ListingPatch, NewListing};
use crate::listing::repository::ListingRepository;
use crate::media::{self, ImagePayload, ImageStore, UploadLimits};

/// Orchestrates a listing request: validate the form, push attached
/// images to the external store, then persist. Validation failures
/// short-circuit before any network call.
pub struct ListingService {
    repo: Arc<dyn ListingRepository>,
    images: Arc<dyn ImageStore>,
    limits: UploadLimits,
}

impl ListingService {
    pub fn new(repo: Arc<dyn ListingRepository>, images: Arc<dyn ImageStore>, limits: UploadLimits) -> Self {
        Self { repo, images, limits }
    }

    /// Create a listing for the authenticated owner. A request with zero
    /// files is accepted and yields an empty image array.
    #[instrument(skip(self, form, files), fields(owner_id = %owner_id, files = files.len()))]
    pub async fn create(
        &self,
        owner_id: Uuid,
        form: ListingForm,
        files: Vec<ImagePayload>,
    ) -> Result<models::listing::Model, ServiceError> {
        let valid = form.validate().map_err(ServiceError::Validation)?;

        let image_urls = media::upload_all(Arc::clone(&self.images), files, &self.limits).await?;
        let uploaded = image_urls.len();

        let new = NewListing {
            owner_id,
            name: valid.name,
            city: valid.city,
            country: valid.country,
            description: valid.description,
            kind: valid.kind,
            price_per_night: valid.price_per_night,
            facilities: valid.facilities,
            image_urls,
            last_updated: Utc::now().into(),
        };
        let created = match self.repo.create(new).await {
            Ok(m) => m,
            Err(e) => {
                // The uploaded objects stay behind with no referencing record
                error!(owner_id = %owner_id, orphaned_uploads = uploaded, err = %e, "listing persist failed after upload");
                return Err(e);
            }
        };
        info!(id = %created.id, images = created.image_urls.len(), "created listing");
        Ok(created)
    }

    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<models::listing::Model>, ServiceError> {
        self.repo.list_by_owner(owner_id).await
    }

    /// Owner-scoped fetch. An id belonging to another host reads as
    /// absent; "does not exist" and "exists but not yours" are the same
    /// answer on purpose.
    pub async fn get(&self, id: Uuid, owner_id: Uuid) -> Result<Option<models::listing::Model>, ServiceError> {
        self.repo.find_by_owner(id, owner_id).await
    }

    /// Update a listing the caller owns. The owner-scoped lookup runs
    /// before any upload, so a miss performs no outbound calls. Fresh
    /// upload URLs go in front of the client-retained list and the whole
    /// record is written once.
    #[instrument(skip(self, form, files), fields(id = %id, owner_id = %owner_id, files = files.len()))]
    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        form: ListingForm,
        files: Vec<ImagePayload>,
    ) -> Result<Option<models::listing::Model>, ServiceError> {
        let valid = form.validate().map_err(ServiceError::Validation)?;

        if self.repo.find_by_owner(id, owner_id).await?.is_none() {
            return Ok(None);
        }

        let mut image_urls = media::upload_all(Arc::clone(&self.images), files, &self.limits).await?;
        let uploaded = image_urls.len();
        image_urls.extend(form.image_urls);

        let patch = ListingPatch {
            name: valid.name,
            city: valid.city,
            country: valid.country,
            description: valid.description,
            kind: valid.kind,
            price_per_night: valid.price_per_night,
            facilities: valid.facilities,
            image_urls,
            last_updated: Utc::now().into(),
        };
        let updated = match self.repo.update_by_owner(id, owner_id, patch).await {
            Ok(m) => m,
            Err(e) => {
                error!(id = %id, orphaned_uploads = uploaded, err = %e, "listing update failed after upload");
                return Err(e);
            }
        };
        if let Some(m) = &updated {
            info!(id = %m.id, images = m.image_urls.len(), "updated listing");
        }
        Ok(updated)
    }

    /// Remove every listing the caller owns. Removing nothing is still a
    /// success, which makes the operation idempotent.
    pub async fn delete_all(&self, owner_id: Uuid) -> Result<u64, ServiceError> {
        let removed = self.repo.delete_all_by_owner(owner_id).await?;
        info!(owner_id = %owner_id, removed, "deleted listings for owner");
        Ok(removed)
    }
}
