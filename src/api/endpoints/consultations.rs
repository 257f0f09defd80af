//! Consultation endpoints for doctors.
//!
//! `GET /api/consultations/in-queue`: lab-complete requests awaiting a doctor
//! `GET /api/consultations`: requests this doctor has taken
//! `PUT /api/consultations/assign/:id`: take a request for consultation
//! `PUT /api/consultations/update/:id`: submit the suggestion

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{Extension, Json};

use crate::api::error::ApiError;
use crate::api::types::{ActingUser, ApiContext};
use crate::lifecycle::{query, CreateConsultationRequest, RequestLifecycleEngine};
use crate::models::enums::RequestStatus;
use crate::models::TestRequest;

pub async fn in_queue(
    State(ctx): State<ApiContext>,
) -> Result<Json<Vec<TestRequest>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(query::find_by_status(&conn, RequestStatus::LabTestCompleted)?))
}

pub async fn assigned(
    State(ctx): State<ApiContext>,
    Extension(ActingUser(doctor)): Extension<ActingUser>,
) -> Result<Json<Vec<TestRequest>>, ApiError> {
    let conn = ctx.core.lock_db()?;
    Ok(Json(query::find_by_doctor(&conn, &doctor)?))
}

pub async fn assign(
    State(ctx): State<ApiContext>,
    Extension(ActingUser(doctor)): Extension<ActingUser>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<TestRequest>, ApiError> {
    let Path(request_id) = path?;
    let conn = ctx.core.lock_db()?;
    let updated = RequestLifecycleEngine::new(&conn).assign_for_consultation(request_id, &doctor)?;
    Ok(Json(updated))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    Extension(ActingUser(doctor)): Extension<ActingUser>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<CreateConsultationRequest>, JsonRejection>,
) -> Result<Json<TestRequest>, ApiError> {
    let Path(request_id) = path?;
    let Json(input) = body?;
    let conn = ctx.core.lock_db()?;
    let updated =
        RequestLifecycleEngine::new(&conn).update_consultation(request_id, &input, &doctor)?;
    Ok(Json(updated))
}
