//! Identity middleware.
//!
//! Authentication happens upstream; the gateway forwards the resolved user
//! as `X-User-Id` / `X-User-Name`. This layer parses them into an
//! `ActingUser` for downstream handlers and rejects requests without one.

use axum::http::{HeaderMap, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{ActingUser, USER_ID_HEADER, USER_NAME_HEADER};
use crate::models::User;

pub async fn require_identity(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    match identity_from_headers(req.headers()) {
        Ok(user) => {
            req.extensions_mut().insert(ActingUser(user));
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

pub fn identity_from_headers(headers: &HeaderMap) -> Result<User, ApiError> {
    let id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<i64>().ok())
        .ok_or(ApiError::Unauthorized)?;

    let name = headers
        .get(USER_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    Ok(User::new(id, name))
}
