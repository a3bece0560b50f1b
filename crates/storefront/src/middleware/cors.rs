//! CORS handling.
//!
//! The public form endpoint echoes the request origin when it is on the
//! configured allow-list and otherwise answers with the first configured
//! origin, so browsers never see a missing CORS header - including on error
//! and preflight responses. The `/api` routes use `tower-http`'s `CorsLayer`
//! instead (they have no echo-fallback requirement).

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::state::AppState;

/// Headers browsers may send to the form endpoint.
const ALLOWED_REQUEST_HEADERS: &str = "authorization, content-type";

/// Pick the origin to echo back: the request origin when allow-listed,
/// otherwise the first configured origin.
#[must_use]
pub fn resolve_allowed_origin<'a>(
    allowed: &'a [String],
    request_origin: Option<&'a str>,
) -> &'a str {
    request_origin
        .filter(|origin| allowed.iter().any(|a| a == origin))
        .or_else(|| allowed.first().map(String::as_str))
        .unwrap_or_default()
}

/// Attach form-endpoint CORS headers to every response.
pub async fn contact_cors(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let request_origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let allowed =
        resolve_allowed_origin(&state.config().allowed_origins, request_origin.as_deref())
            .to_owned();

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    if let Ok(value) = HeaderValue::from_str(&allowed) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_REQUEST_HEADERS),
    );

    response
}

/// CORS layer for the `/api` routes, restricted to the configured origins.
#[must_use]
pub fn api_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow_list() -> Vec<String> {
        vec![
            "https://nfluential.us".to_string(),
            "https://www.nfluential.us".to_string(),
        ]
    }

    #[test]
    fn test_listed_origin_is_echoed() {
        let allowed = allow_list();
        let origin = resolve_allowed_origin(&allowed, Some("https://www.nfluential.us"));
        assert_eq!(origin, "https://www.nfluential.us");
    }

    #[test]
    fn test_unlisted_origin_falls_back_to_first() {
        let allowed = allow_list();
        let origin = resolve_allowed_origin(&allowed, Some("https://evil.example"));
        assert_eq!(origin, "https://nfluential.us");
    }

    #[test]
    fn test_missing_origin_falls_back_to_first() {
        let allowed = allow_list();
        let origin = resolve_allowed_origin(&allowed, None);
        assert_eq!(origin, "https://nfluential.us");
    }

    #[test]
    fn test_empty_allow_list_yields_empty_origin() {
        let origin = resolve_allowed_origin(&[], Some("https://nfluential.us"));
        assert_eq!(origin, "");
    }
}
