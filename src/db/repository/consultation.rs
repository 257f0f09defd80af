use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

use super::test_request::DATETIME_FORMAT;

/// Attach a consultation to a request, replacing any earlier one.
pub fn upsert_consultation(
    conn: &Connection,
    request_id: i64,
    consultation: &Consultation,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO consultations (request_id, suggestion, comments, doctor_id,
         doctor_name, updated_on)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(request_id) DO UPDATE SET
            suggestion = excluded.suggestion,
            comments = excluded.comments,
            doctor_id = excluded.doctor_id,
            doctor_name = excluded.doctor_name,
            updated_on = excluded.updated_on",
        params![
            request_id,
            consultation.suggestion.map(|s| s.as_str()),
            consultation.comments,
            consultation.doctor.id,
            consultation.doctor.user_name,
            consultation.updated_on.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}
