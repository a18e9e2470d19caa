use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::listing::repository::SeaOrmListingRepository;
use service::listing::service::ListingService;
use service::media::http_store::HttpImageStore;
use service::media::UploadLimits;

use crate::auth::{ServerAuthConfig, ServerState};
use crate::routes;

fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(7000);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let mut cfg = configs::load_default().unwrap_or_default();
    cfg.image_store.normalize_from_env();
    cfg.uploads.validate()?;

    // DB pool sized and bounded by the config; the url falls back to
    // DATABASE_URL when the file carries none
    cfg.database.normalize_from_env();
    if cfg.database.url.trim().is_empty() {
        cfg.database.url = models::db::DATABASE_URL.clone();
    }
    cfg.database.validate()?;
    let db = models::db::connect(&cfg.database).await?;

    // External image store client
    if cfg.image_store.endpoint.trim().is_empty() {
        anyhow::bail!("image store endpoint missing; set [image_store].endpoint or IMAGE_STORE_URL");
    }
    let images = HttpImageStore::new(
        cfg.image_store.endpoint.clone(),
        Duration::from_secs(cfg.image_store.timeout_secs),
    )
    .map_err(|e| anyhow::anyhow!("image store client: {e}"))?;

    let uploads = UploadLimits {
        max_files: cfg.uploads.max_files_per_request,
        max_file_bytes: cfg.uploads.max_file_bytes,
    };

    let repo = SeaOrmListingRepository { db };
    let listings = Arc::new(ListingService::new(Arc::new(repo), Arc::new(images), uploads));

    // JWT secret
    let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_string());
    let state = ServerState {
        listings,
        auth: ServerAuthConfig { jwt_secret },
        uploads,
    };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, "starting listings server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
