use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Wire shape of a listing record.
#[derive(ToSchema)]
#[schema(as = Listing)]
pub struct ListingDoc {
    pub id: Uuid,
    #[schema(rename = "ownerId")]
    pub owner_id: Uuid,
    pub name: String,
    pub city: String,
    pub country: String,
    pub description: String,
    #[schema(rename = "type")]
    pub kind: String,
    #[schema(rename = "pricePerNight")]
    pub price_per_night: f64,
    pub facilities: Vec<String>,
    #[schema(rename = "imageUrls")]
    pub image_urls: Vec<String>,
    #[schema(rename = "lastUpdated")]
    pub last_updated: String,
}

#[derive(ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::listings::create,
        crate::routes::listings::list_mine,
        crate::routes::listings::get_one,
        crate::routes::listings::update,
        crate::routes::listings::delete_mine,
    ),
    components(schemas(HealthResponse, ListingDoc, MessageResponse)),
    tags(
        (name = "listings", description = "Owner-scoped hotel listings"),
        (name = "meta", description = "Service health")
    )
)]
pub struct ApiDoc;
