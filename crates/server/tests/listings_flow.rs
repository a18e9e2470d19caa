use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::Engine as _;
use serde_json::Value;
use tower::Service;
use uuid::Uuid;

use server::auth::{ServerAuthConfig, ServerState};
use server::routes;
use service::listing::memory::InMemoryListingRepository;
use service::listing::repository::ListingRepository;
use service::listing::service::ListingService;
use service::media::local::LocalImageStore;
use service::media::{ImageStore, UploadLimits};

const BOUNDARY: &str = "listing-test-boundary";

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

fn build_app() -> (Router, Arc<InMemoryListingRepository>, Arc<LocalImageStore>) {
    let repo = Arc::new(InMemoryListingRepository::new());
    let images = Arc::new(LocalImageStore::new("https://img.local"));
    let listings = Arc::new(ListingService::new(
        Arc::clone(&repo) as Arc<dyn ListingRepository>,
        Arc::clone(&images) as Arc<dyn ImageStore>,
        UploadLimits::default(),
    ));
    let state = ServerState {
        listings,
        auth: ServerAuthConfig { jwt_secret: "test-secret".into() },
        uploads: UploadLimits::default(),
    };
    (routes::build_router(cors(), state), repo, images)
}

fn token_for(user_id: Uuid) -> String {
    #[derive(serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Claims {
        user_id: String,
        exp: usize,
    }
    let exp = (chrono::Utc::now().timestamp() + 3600) as usize;
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &Claims { user_id: user_id.to_string(), exp },
        &jsonwebtoken::EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}

/// Minimal multipart body builder: text fields plus binary image parts.
fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n").as_bytes(),
        );
    }
    for (filename, bytes) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"imageFiles\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn lotus_inn_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Lotus Inn"),
        ("city", "Hanoi"),
        ("country", "Vietnam"),
        ("description", "x"),
        ("type", "Hotel"),
        ("pricePerNight", "50"),
        ("facilities", "wifi"),
    ]
}

fn multipart_request(method: &str, uri: &str, token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn b64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[tokio::test]
async fn create_lotus_inn_returns_created_record() {
    let (mut app, _repo, _images) = build_app();
    let owner = Uuid::new_v4();
    let jpeg = vec![0xFFu8; 1024];
    let body = multipart_body(&lotus_inn_fields(), &[("room.jpg", jpeg.as_slice())]);

    let resp = app
        .call(multipart_request("POST", "/listings", &token_for(owner), body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let v = json_body(resp).await;
    assert_eq!(v["pricePerNight"], 50.0);
    assert_eq!(v["type"], "Hotel");
    assert_eq!(v["ownerId"], owner.to_string());
    assert_eq!(v["imageUrls"].as_array().unwrap().len(), 1);
    assert!(v["lastUpdated"].is_string());
}

#[tokio::test]
async fn create_missing_fields_is_rejected_before_persist() {
    let (mut app, repo, images) = build_app();
    let body = multipart_body(&[("name", "Lonely Field Hotel")], &[]);

    let resp = app
        .call(multipart_request("POST", "/listings", &token_for(Uuid::new_v4()), body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let v = json_body(resp).await;
    let msgs = v["message"].as_array().unwrap();
    assert!(msgs.contains(&Value::String("City is required".into())));
    assert!(msgs.contains(&Value::String("Facilities are required".into())));
    assert_eq!(repo.calls(), 0);
    assert_eq!(images.stored(), 0);
}

#[tokio::test]
async fn create_preserves_image_order() {
    let (mut app, _repo, _images) = build_app();
    let files: Vec<(&str, &[u8])> = vec![
        ("a.jpg", b"img-0".as_slice()),
        ("b.jpg", b"img-1".as_slice()),
        ("c.jpg", b"img-2".as_slice()),
    ];
    let body = multipart_body(&lotus_inn_fields(), &files);

    let resp = app
        .call(multipart_request("POST", "/listings", &token_for(Uuid::new_v4()), body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let v = json_body(resp).await;
    let urls: Vec<String> = v["imageUrls"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u.as_str().unwrap().to_string())
        .collect();
    let expected: Vec<String> = [b"img-0".as_slice(), b"img-1", b"img-2"]
        .iter()
        .map(|p| format!("https://img.local/{}", b64(p)))
        .collect();
    assert_eq!(urls, expected);
}

#[tokio::test]
async fn health_needs_no_credential() {
    let (mut app, _repo, _images) = build_app();
    let resp = app
        .call(Request::builder().method("GET").uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["status"], "ok");
}

#[tokio::test]
async fn preflight_needs_no_credential() {
    let (mut app, _repo, _images) = build_app();
    let resp = app
        .call(Request::builder().method("OPTIONS").uri("/listings").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_ne!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let (mut app, _repo, _images) = build_app();
    let resp = app
        .call(Request::builder().method("GET").uri("/listings").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cookie_credential_is_accepted() {
    let (mut app, _repo, _images) = build_app();
    let resp = app
        .call(
            Request::builder()
                .method("GET")
                .uri("/listings")
                .header("cookie", format!("auth_token={}", token_for(Uuid::new_v4())))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn foreign_listing_reads_as_null() {
    let (mut app, _repo, _images) = build_app();
    let owner = Uuid::new_v4();
    let body = multipart_body(&lotus_inn_fields(), &[]);
    let resp = app
        .call(multipart_request("POST", "/listings", &token_for(owner), body))
        .await
        .unwrap();
    let created = json_body(resp).await;
    let id = created["id"].as_str().unwrap().to_string();

    // Same id, different principal: 200 with a null body, no existence leak
    let other = Uuid::new_v4();
    let resp = app
        .call(
            Request::builder()
                .method("GET")
                .uri(format!("/listings/{id}"))
                .header("authorization", format!("Bearer {}", token_for(other)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, Value::Null);
}

#[tokio::test]
async fn update_merges_new_uploads_before_retained() {
    let (mut app, _repo, _images) = build_app();
    let owner = Uuid::new_v4();
    let token = token_for(owner);

    let files: Vec<(&str, &[u8])> = vec![("a.jpg", b"A".as_slice()), ("b.jpg", b"B".as_slice())];
    let body = multipart_body(&lotus_inn_fields(), &files);
    let resp = app.call(multipart_request("POST", "/listings", &token, body)).await.unwrap();
    let created = json_body(resp).await;
    let id = created["id"].as_str().unwrap().to_string();
    let url_b = created["imageUrls"][1].as_str().unwrap().to_string();

    let mut fields = lotus_inn_fields();
    fields.push(("imageUrls", url_b.as_str()));
    let body = multipart_body(&fields, &[("c.jpg", b"C".as_slice())]);
    let resp = app
        .call(multipart_request("PUT", &format!("/listings/{id}"), &token, body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let updated = json_body(resp).await;
    let urls: Vec<String> = updated["imageUrls"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u.as_str().unwrap().to_string())
        .collect();
    assert_eq!(urls, vec![format!("https://img.local/{}", b64(b"C")), url_b]);
}

#[tokio::test]
async fn update_unknown_id_is_not_found_without_upload() {
    let (mut app, _repo, images) = build_app();
    let body = multipart_body(&lotus_inn_fields(), &[("c.jpg", b"C".as_slice())]);
    let resp = app
        .call(multipart_request(
            "PUT",
            &format!("/listings/{}", Uuid::new_v4()),
            &token_for(Uuid::new_v4()),
            body,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(images.stored(), 0);
}

#[tokio::test]
async fn delete_twice_succeeds_both_times() {
    let (mut app, _repo, _images) = build_app();
    let owner = Uuid::new_v4();
    let token = token_for(owner);

    let body = multipart_body(&lotus_inn_fields(), &[]);
    let resp = app.call(multipart_request("POST", "/listings", &token, body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    for _ in 0..2 {
        let resp = app
            .call(
                Request::builder()
                    .method("DELETE")
                    .uri("/listings")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["message"], "Delete Successful");
    }
}

#[tokio::test]
async fn list_returns_only_callers_listings() {
    let (mut app, _repo, _images) = build_app();
    let host_a = Uuid::new_v4();
    let host_b = Uuid::new_v4();

    let body = multipart_body(&lotus_inn_fields(), &[]);
    app.call(multipart_request("POST", "/listings", &token_for(host_a), body)).await.unwrap();
    let body = multipart_body(&lotus_inn_fields(), &[]);
    app.call(multipart_request("POST", "/listings", &token_for(host_a), body)).await.unwrap();

    let resp = app
        .call(
            Request::builder()
                .method("GET")
                .uri("/listings")
                .header("authorization", format!("Bearer {}", token_for(host_b)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 0);

    let resp = app
        .call(
            Request::builder()
                .method("GET")
                .uri("/listings")
                .header("authorization", format!("Bearer {}", token_for(host_a)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(json_body(resp).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let (mut app, _repo, _images) = build_app();
    #[derive(serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Claims {
        user_id: String,
        exp: usize,
    }
    let stale = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &Claims {
            user_id: Uuid::new_v4().to_string(),
            exp: (chrono::Utc::now().timestamp() - 3600) as usize,
        },
        &jsonwebtoken::EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap();

    let resp = app
        .call(
            Request::builder()
                .method("GET")
                .uri("/listings")
                .header("authorization", format!("Bearer {stale}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
