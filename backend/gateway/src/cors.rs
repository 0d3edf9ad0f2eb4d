//! CORS response headers.
//!
//! Every response carries the same fixed header set, including errors and
//! the OPTIONS preflight. Origin `*` together with credentials `true` is
//! what browser clients of this service expect, and `tower_http::cors`
//! refuses that combination, so the headers are stamped on directly.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

const ALLOW_METHODS: &str = "GET,OPTIONS,PATCH,DELETE,POST,PUT";
const ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, \
                             Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

/// Middleware stamping the fixed CORS header set on every response.
pub async fn apply_cors(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        "Access-Control-Allow-Credentials",
        HeaderValue::from_static("true"),
    );
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    response
}
