use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::*;

use super::test_request::DATETIME_FORMAT;

/// Attach a lab result to a request, replacing any earlier one.
pub fn upsert_lab_result(
    conn: &Connection,
    request_id: i64,
    lab: &LabResult,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO lab_results (request_id, blood_pressure, heart_beat, oxygen_level,
         temperature, comments, result, tester_id, tester_name, updated_on)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(request_id) DO UPDATE SET
            blood_pressure = excluded.blood_pressure,
            heart_beat = excluded.heart_beat,
            oxygen_level = excluded.oxygen_level,
            temperature = excluded.temperature,
            comments = excluded.comments,
            result = excluded.result,
            tester_id = excluded.tester_id,
            tester_name = excluded.tester_name,
            updated_on = excluded.updated_on",
        params![
            request_id,
            lab.blood_pressure,
            lab.heart_beat,
            lab.oxygen_level,
            lab.temperature,
            lab.comments,
            lab.result.map(|r| r.as_str()),
            lab.tester.id,
            lab.tester.user_name,
            lab.updated_on.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}
