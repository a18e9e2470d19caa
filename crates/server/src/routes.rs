use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::auth::{self, ServerState};
use crate::openapi;

pub mod listings;

#[utoipa::path(get, path = "/health", tag = "meta", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public health/docs plus the
/// guarded listing resource. Every listing route, mutating or not, sits
/// behind the access guard; the owner always comes from the resolved
/// principal, never from the request path.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    // Whole-body cap sized for a full image batch plus the text fields
    let body_limit = state.uploads.max_files * state.uploads.max_file_bytes + 1024 * 1024;

    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()));

    let api = Router::new()
        .route(
            "/listings",
            get(listings::list_mine)
                .post(listings::create)
                .delete(listings::delete_mine),
        )
        .route("/listings/:id", get(listings::get_one).put(listings::update))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth))
        .layer(DefaultBodyLimit::max(body_limit));

    public
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
