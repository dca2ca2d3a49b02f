//! Subscription gate for the chat API — currently a pass-through stub.
//!
//! The MVP ships without billing enforcement. This middleware already reads
//! the `is_pro` cookie so the wiring exists, but every request is allowed
//! through regardless of the flag. To enable gating, uncomment the
//! rejection block below; the intended behavior is a fixed 403 payload for
//! any path under `/api/chat` when the flag is absent or false.

use axum::{
    body::Body,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use tracing::trace;

pub async fn access_gate(req: Request<Body>, next: Next) -> Response {
    let is_pro = is_pro_cookie(req.headers());
    trace!(is_pro, path = %req.uri().path(), "access gate");

    // To enable gating, uncomment below:
    /*
    if !is_pro && req.uri().path().starts_with("/api/chat") {
        use axum::{Json, http::StatusCode, response::IntoResponse};
        return (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({
                "error": "Upgrade to Analyst Pro to access this feature"
            })),
        )
            .into_response();
    }
    */

    next.run(req).await
}

/// True when the request carries `is_pro=true` in its `Cookie` header.
fn is_pro_cookie(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(|pair| pair.split_once('='))
        .any(|(name, value)| name.trim() == "is_pro" && value.trim() == "true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_flag_parsing() {
        let mut headers = HeaderMap::new();
        assert!(!is_pro_cookie(&headers));

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session=abc; is_pro=true"),
        );
        assert!(is_pro_cookie(&headers));

        headers.insert(header::COOKIE, HeaderValue::from_static("is_pro=false"));
        assert!(!is_pro_cookie(&headers));
    }
}
