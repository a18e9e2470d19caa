use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::{error, info};
use uuid::Uuid;

use service::errors::ServiceError;
use service::listing::domain::ListingForm;
use service::media::{ImagePayload, UploadLimits};

use crate::auth::{Principal, ServerState};
use crate::errors::JsonApiError;

/// Multipart field names the listing form accepts. `facilities` and
/// `imageUrls` repeat once per entry; `imageFiles` carries the binary
/// parts.
async fn read_listing_form(
    mut multipart: Multipart,
    limits: &UploadLimits,
) -> Result<(ListingForm, Vec<ImagePayload>), JsonApiError> {
    let mut form = ListingForm::default();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, &format!("malformed multipart body: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("name") => form.name = Some(text(field).await?),
            Some("city") => form.city = Some(text(field).await?),
            Some("country") => form.country = Some(text(field).await?),
            Some("description") => form.description = Some(text(field).await?),
            Some("type") => form.kind = Some(text(field).await?),
            Some("pricePerNight") => form.price_per_night = Some(text(field).await?),
            Some("facilities") => form.facilities.push(text(field).await?),
            Some("imageUrls") => form.image_urls.push(text(field).await?),
            Some("imageFiles") => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    JsonApiError::new(StatusCode::BAD_REQUEST, &format!("failed to read image part: {e}"))
                })?;
                // Per-part cap enforced at the transport edge, before the
                // upload pipeline ever sees the payload
                if bytes.len() > limits.max_file_bytes {
                    return Err(JsonApiError::new(
                        StatusCode::BAD_REQUEST,
                        "image exceeds the per-file size limit",
                    ));
                }
                files.push(ImagePayload { content_type, bytes: bytes.to_vec() });
            }
            _ => {}
        }
    }
    Ok((form, files))
}

async fn text(field: Field<'_>) -> Result<String, JsonApiError> {
    field
        .text()
        .await
        .map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, &format!("failed to read form field: {e}")))
}

#[utoipa::path(
    post, path = "/listings", tag = "listings",
    responses(
        (status = 201, description = "Created", body = crate::openapi::ListingDoc),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<models::listing::Model>), JsonApiError> {
    let (form, files) = read_listing_form(multipart, &state.uploads).await?;
    match state.listings.create(principal.user_id, form, files).await {
        Ok(m) => {
            info!(id = %m.id, owner_id = %principal.user_id, "listing created");
            Ok((StatusCode::CREATED, Json(m)))
        }
        Err(ServiceError::Validation(msgs)) => Err(JsonApiError::validation(msgs)),
        Err(e) => {
            error!(err = %e, "create listing failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong"))
        }
    }
}

#[utoipa::path(
    get, path = "/listings", tag = "listings",
    responses(
        (status = 200, description = "Caller's listings", body = [crate::openapi::ListingDoc]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Fetch Failed")
    )
)]
pub async fn list_mine(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<models::listing::Model>>, JsonApiError> {
    match state.listings.list(principal.user_id).await {
        Ok(list) => Ok(Json(list)),
        Err(e) => {
            error!(err = %e, "list listings failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching hotels"))
        }
    }
}

#[utoipa::path(
    get, path = "/listings/{id}", tag = "listings",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Record, or null when absent or not owned"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Fetch Failed")
    )
)]
pub async fn get_one(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<models::listing::Model>>, JsonApiError> {
    match state.listings.get(id, principal.user_id).await {
        // A foreign or unknown id reads as null, status 200
        Ok(found) => Ok(Json(found)),
        Err(e) => {
            error!(err = %e, id = %id, "get listing failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching hotel"))
        }
    }
}

#[utoipa::path(
    put, path = "/listings/{id}", tag = "listings",
    params(("id" = Uuid, Path, description = "Listing ID")),
    responses(
        (status = 201, description = "Updated", body = crate::openapi::ListingDoc),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<models::listing::Model>), JsonApiError> {
    let (form, files) = read_listing_form(multipart, &state.uploads).await?;
    match state.listings.update(id, principal.user_id, form, files).await {
        Ok(Some(m)) => {
            info!(id = %m.id, "listing updated");
            Ok((StatusCode::CREATED, Json(m)))
        }
        Ok(None) => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Hotel not found")),
        Err(ServiceError::Validation(msgs)) => Err(JsonApiError::validation(msgs)),
        Err(e) => {
            error!(err = %e, id = %id, "update listing failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong"))
        }
    }
}

#[utoipa::path(
    delete, path = "/listings", tag = "listings",
    responses(
        (status = 200, description = "Delete Successful"),
        (status = 400, description = "Delete Failed"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn delete_mine(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<serde_json::Value>, JsonApiError> {
    match state.listings.delete_all(principal.user_id).await {
        Ok(removed) => {
            info!(owner_id = %principal.user_id, removed, "listings deleted");
            Ok(Json(serde_json::json!({ "message": "Delete Successful" })))
        }
        Err(e) => {
            error!(err = %e, owner_id = %principal.user_id, "delete listings failed");
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Delete Failed"))
        }
    }
}
