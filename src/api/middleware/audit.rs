//! Audit logging middleware.
//!
//! Logs every API request with method, path, acting user and response
//! status, tagged with a request id that is echoed back to the caller.

use std::time::Instant;

use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::api::middleware::identity::identity_from_headers;
use crate::api::types::REQUEST_ID_HEADER;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let user_id = identity_from_headers(req.headers()).ok().map(|u| u.id);

    // Keep a caller-supplied id so traces line up across services
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let started = Instant::now();
    let mut response = next.run(req).await;
    let status = response.status().as_u16();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        user_id = ?user_id,
        status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "API access"
    );

    if let Ok(val) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    response
}
