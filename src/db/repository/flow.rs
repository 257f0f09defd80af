use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::enums::RequestStatus;
use crate::models::*;

use super::test_request::{parse_datetime, DATETIME_FORMAT};

/// Append one status change to the request's flow log.
pub fn insert_flow_entry(
    conn: &Connection,
    request_id: i64,
    from: Option<RequestStatus>,
    to: RequestStatus,
    changed_by: &User,
    happened_on: NaiveDateTime,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO test_request_flow (request_id, from_status, to_status,
         changed_by_id, changed_by_name, happened_on)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            request_id,
            from.map(|s| s.as_str()),
            to.as_str(),
            changed_by.id,
            changed_by.user_name,
            happened_on.format(DATETIME_FORMAT).to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_flow_for_request(
    conn: &Connection,
    request_id: i64,
) -> Result<Vec<TestRequestFlow>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, request_id, from_status, to_status, changed_by_id, changed_by_name,
         happened_on
         FROM test_request_flow WHERE request_id = ?1 ORDER BY id ASC",
    )?;

    let rows = stmt.query_map(params![request_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, i64>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
        ))
    })?;

    let mut entries = Vec::new();
    for row in rows {
        let (id, request_id, from, to, user_id, user_name, happened_on) = row?;
        entries.push(TestRequestFlow {
            id,
            request_id,
            from_status: from.as_deref().map(RequestStatus::from_str).transpose()?,
            to_status: RequestStatus::from_str(&to)?,
            changed_by: User::new(user_id, user_name),
            happened_on: parse_datetime(Some(&happened_on))?,
        });
    }
    Ok(entries)
}
