use models::errors::ModelError;
use models::listing;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::listing::domain::{ListingPatch, NewListing};

/// Insert a brand-new listing; the id is assigned here.
pub async fn create_listing(db: &DatabaseConnection, new: NewListing) -> Result<listing::Model, ServiceError> {
    let am = listing::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(new.owner_id),
        name: Set(new.name),
        city: Set(new.city),
        country: Set(new.country),
        description: Set(new.description),
        kind: Set(new.kind),
        price_per_night: Set(new.price_per_night),
        facilities: Set(new.facilities.into()),
        image_urls: Set(new.image_urls.into()),
        last_updated: Set(new.last_updated),
    };
    Ok(am.insert(db).await.map_err(ModelError::db)?)
}

/// All listings for an owner, storage order.
pub async fn list_by_owner(db: &DatabaseConnection, owner_id: Uuid) -> Result<Vec<listing::Model>, ServiceError> {
    Ok(listing::Entity::find()
        .filter(listing::Column::OwnerId.eq(owner_id))
        .all(db)
        .await
        .map_err(ModelError::db)?)
}

/// A single listing, only when both id and owner match. An id belonging
/// to another owner reads as absent.
pub async fn find_by_owner(db: &DatabaseConnection, id: Uuid, owner_id: Uuid) -> Result<Option<listing::Model>, ServiceError> {
    Ok(listing::Entity::find()
        .filter(listing::Column::Id.eq(id))
        .filter(listing::Column::OwnerId.eq(owner_id))
        .one(db)
        .await
        .map_err(ModelError::db)?)
}

/// Owner-scoped single-record write. Returns None when the id/owner pair
/// does not match; the patch is applied as one update statement.
pub async fn update_by_owner(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
    patch: ListingPatch,
) -> Result<Option<listing::Model>, ServiceError> {
    let Some(found) = find_by_owner(db, id, owner_id).await? else {
        return Ok(None);
    };
    let mut am: listing::ActiveModel = found.into();
    am.name = Set(patch.name);
    am.city = Set(patch.city);
    am.country = Set(patch.country);
    am.description = Set(patch.description);
    am.kind = Set(patch.kind);
    am.price_per_night = Set(patch.price_per_night);
    am.facilities = Set(patch.facilities.into());
    am.image_urls = Set(patch.image_urls.into());
    am.last_updated = Set(patch.last_updated);
    Ok(Some(am.update(db).await.map_err(ModelError::db)?))
}

/// Remove every listing owned by the given principal. Zero rows is a
/// success, not an error.
pub async fn delete_all_by_owner(db: &DatabaseConnection, owner_id: Uuid) -> Result<u64, ServiceError> {
    let res = listing::Entity::delete_many()
        .filter(listing::Column::OwnerId.eq(owner_id))
        .exec(db)
        .await
        .map_err(ModelError::db)?;
    Ok(res.rows_affected)
}
