use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::Engine;
use std::sync::Arc;
use tracing::error;

use super::AppState;
use crate::services::auth;

/// Authenticated admin identity, attached to the request by
/// [`require_basic_auth`]. There is exactly one privilege tier, so this
/// carries the username for display only.
#[derive(Debug, Clone)]
pub struct AdminPrincipal {
    pub username: String,
}

/// Gate for admin-prefixed routes. Missing or invalid credentials get a
/// 401 with a `WWW-Authenticate` challenge; valid credentials attach an
/// [`AdminPrincipal`] extension for downstream handlers.
pub async fn require_basic_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some((username, password)) = basic_credentials(request.headers()) else {
        return challenge();
    };

    let hash = match state.store.get_password_hash(&username).await {
        Ok(Some(hash)) => hash,
        Ok(None) => return challenge(),
        Err(e) => {
            error!("Failed to load admin credentials: {e:#}");
            return challenge();
        }
    };

    match auth::verify_password(&hash, &password).await {
        Ok(true) => {
            request.extensions_mut().insert(AdminPrincipal { username });
            next.run(request).await
        }
        Ok(false) => challenge(),
        Err(e) => {
            error!("Password verification failed: {e:#}");
            challenge()
        }
    }
}

/// Parse an `Authorization: Basic` header into a username/password pair.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Identical for a missing header, an unknown username, and a wrong
/// password, so the response never reveals which factor failed.
fn challenge() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"Admin Area\"")],
        "Unauthorized",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_basic_credentials_roundtrip() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("admin:s3cret");
        let headers = headers_with_auth(&format!("Basic {encoded}"));

        let (username, password) = basic_credentials(&headers).unwrap();
        assert_eq!(username, "admin");
        assert_eq!(password, "s3cret");
    }

    #[test]
    fn test_basic_credentials_password_may_contain_colons() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("admin:a:b:c");
        let headers = headers_with_auth(&format!("Basic {encoded}"));

        let (_, password) = basic_credentials(&headers).unwrap();
        assert_eq!(password, "a:b:c");
    }

    #[test]
    fn test_basic_credentials_rejects_other_schemes() {
        let headers = headers_with_auth("Bearer some-token");
        assert!(basic_credentials(&headers).is_none());

        assert!(basic_credentials(&HeaderMap::new()).is_none());
    }
}
