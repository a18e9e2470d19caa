use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use service::listing::service::ListingService;
use service::media::UploadLimits;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub listings: Arc<ListingService>,
    pub auth: ServerAuthConfig,
    pub uploads: UploadLimits,
}

/// The authenticated identity resolved from the request credential,
/// attached to request extensions by the guard below.
#[derive(Clone, Copy, Debug)]
pub struct Principal {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    user_id: Option<String>,
    #[allow(dead_code)]
    exp: Option<usize>,
    #[allow(dead_code)]
    iat: Option<usize>,
}

/// Access guard for the listing routes: every request must carry a valid
/// `Authorization: Bearer <token>`, with a fallback to the `auth_token`
/// cookie. Missing, malformed or expired credentials yield 401 with no
/// side effects; on success the resolved principal rides along in the
/// request extensions. One verification attempt per request.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // CORS preflight carries no credential
    if req.method() == axum::http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();

    // Read the Authorization header; fall back to the auth_token cookie
    let token = {
        let authz = req
            .headers()
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        if let Some(h) = authz {
            let prefix = "Bearer ";
            if !h.starts_with(prefix) {
                tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(StatusCode::UNAUTHORIZED);
            }
            h[prefix.len()..].to_string()
        } else {
            let cookie_header = req
                .headers()
                .get(axum::http::header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");

            let mut token_val: Option<String> = None;
            for part in cookie_header.split(';') {
                let kv = part.trim();
                if let Some(rest) = kv.strip_prefix("auth_token=") {
                    token_val = Some(rest.to_string());
                    break;
                }
            }

            match token_val {
                Some(t) if !t.is_empty() => t,
                _ => {
                    tracing::warn!(path = %path, "missing Authorization header and auth_token cookie");
                    return Err(StatusCode::UNAUTHORIZED);
                }
            }
        }
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let data = match decode::<Claims>(&token, &key, &validation) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let principal = data
        .claims
        .user_id
        .as_deref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(|user_id| Principal { user_id });
    match principal {
        Some(p) => {
            req.extensions_mut().insert(p);
            Ok(next.run(req).await)
        }
        None => {
            tracing::warn!(path = %path, "token carries no usable userId claim");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
