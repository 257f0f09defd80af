//! Test request endpoints for the person raising a request.
//!
//! `POST /api/testrequests`: create a request
//! `GET  /api/testrequests`: requests created by the caller
//! `GET  /api/testrequests/:id`: one request
//! `GET  /api/testrequests/:id/flow`: its status history

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::{ActingUser, ApiContext};
use crate::lifecycle::{query, CreateTestRequest, RequestLifecycleEngine};
use crate::models::{TestRequest, TestRequestFlow};

pub async fn create(
    State(ctx): State<ApiContext>,
    Extension(ActingUser(user)): Extension<ActingUser>,
    body: Result<Json<CreateTestRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TestRequest>), ApiError> {
    let Json(input) = body?;
    let conn = ctx.core.lock_db()?;
    let created = RequestLifecycleEngine::new(&conn).create_request(&input, &user)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn mine(
    State(ctx): State<ApiContext>,
    Extension(ActingUser(user)): Extension<ActingUser>,
) -> Result<Json<Vec<TestRequest>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(query::find_by_creator(&conn, &user)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<TestRequest>, ApiError> {
    let Path(request_id) = path?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(query::get_request(&conn, request_id)?))
}

pub async fn flow(
    State(ctx): State<ApiContext>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<TestRequestFlow>>, ApiError> {
    let Path(request_id) = path?;
    let conn = ctx.core.lock_db()?;
    Ok(Json(query::get_flow(&conn, request_id)?))
}
