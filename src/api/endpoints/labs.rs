//! Lab request endpoints for testers.
//!
//! `GET /api/labrequests/to-be-tested`: requests waiting for a tester
//! `GET /api/labrequests`: requests this tester has taken
//! `PUT /api/labrequests/assign/:id`: take a request for testing
//! `PUT /api/labrequests/update/:id`: submit vitals and outcome

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::{ActingUser, ApiContext};
use crate::lifecycle::{query, CreateLabResult, RequestLifecycleEngine};
use crate::models::enums::RequestStatus;
use crate::models::TestRequest;

pub async fn to_be_tested(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<TestRequest>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(query::find_by_status(&conn, RequestStatus::Initiated)?))
}

pub async fn assigned(
    State(ctx): State<ApiContext>,
    Extension(ActingUser(tester)): Extension<ActingUser>,
) -> Result<Json<Vec<TestRequest>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(query::find_by_tester(&conn, &tester)?))
}

pub async fn assign(
    State(ctx): State<ApiContext>,
    Extension(ActingUser(tester)): Extension<ActingUser>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<TestRequest>, ApiError> {
    let Path(request_id) = path?;
    let conn = ctx.core.lock_db()?;
    let updated = RequestLifecycleEngine::new(&conn).assign_for_lab_test(request_id, &tester)?;
    Ok(Json(updated))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(ActingUser(tester)): Extension<ActingUser>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CreateLabResult>, JsonRejection>,
) -> Result<Json<TestRequest>, ApiError> {
    let Path(request_id) = path?;
    let Json(input) = body?;
    let conn = ctx.core.lock_db()?;
    let updated = RequestLifecycleEngine::new(&conn).update_lab_test(request_id, &input, &tester)?;
    Ok(Json(updated))
}
