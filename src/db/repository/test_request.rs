use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::enums::*;
use crate::models::*;

/// Storage format for timestamps (second precision, UTC).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Request columns plus the owned lab result and consultation, LEFT JOINed
/// so a single row carries the whole aggregate.
const SELECT_AGGREGATE: &str =
    "SELECT r.request_id, r.name, r.age, r.gender, r.address, r.phone_number, r.email,
            r.pin_code, r.created_by_id, r.created_by_name, r.created, r.status,
            l.blood_pressure, l.heart_beat, l.oxygen_level, l.temperature, l.comments,
            l.result, l.tester_id, l.tester_name, l.updated_on,
            c.suggestion, c.comments, c.doctor_id, c.doctor_name, c.updated_on
     FROM test_requests r
     LEFT JOIN lab_results l ON l.request_id = r.request_id
     LEFT JOIN consultations c ON c.request_id = r.request_id";

/// Fields of a request before it has an id.
#[derive(Debug, Clone)]
pub struct NewTestRequest {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub address: String,
    pub phone_number: String,
    pub email: String,
    pub pin_code: u32,
    pub created_by: User,
    pub created: NaiveDate,
}

/// Insert a new request in INITIATED and return its assigned id.
pub fn insert_test_request(conn: &Connection, req: &NewTestRequest) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO test_requests (name, age, gender, address, phone_number, email,
         pin_code, created_by_id, created_by_name, created, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            req.name,
            req.age,
            req.gender.as_str(),
            req.address,
            req.phone_number,
            req.email,
            req.pin_code,
            req.created_by.id,
            req.created_by.user_name,
            req.created.format(DATE_FORMAT).to_string(),
            RequestStatus::Initiated.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_test_request(conn: &Connection, request_id: i64) -> Result<Option<TestRequest>, DatabaseError> {
    let sql = format!("{SELECT_AGGREGATE} WHERE r.request_id = ?1");
    let row = conn
        .query_row(&sql, params![request_id], request_row_from_rusqlite)
        .optional()?;
    row.map(request_from_row).transpose()
}

/// Fetch a request only if it is currently in `status`.
pub fn get_test_request_in_status(
    conn: &Connection,
    request_id: i64,
    status: RequestStatus,
) -> Result<Option<TestRequest>, DatabaseError> {
    let sql = format!("{SELECT_AGGREGATE} WHERE r.request_id = ?1 AND r.status = ?2");
    let row = conn
        .query_row(&sql, params![request_id, status.as_str()], request_row_from_rusqlite)
        .optional()?;
    row.map(request_from_row).transpose()
}

pub fn get_test_requests_by_status(
    conn: &Connection,
    status: RequestStatus,
) -> Result<Vec<TestRequest>, DatabaseError> {
    let sql = format!("{SELECT_AGGREGATE} WHERE r.status = ?1 ORDER BY r.request_id ASC");
    query_requests(conn, &sql, params![status.as_str()])
}

pub fn get_test_requests_by_creator(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<TestRequest>, DatabaseError> {
    let sql = format!("{SELECT_AGGREGATE} WHERE r.created_by_id = ?1 ORDER BY r.request_id ASC");
    query_requests(conn, &sql, params![user_id])
}

pub fn get_test_requests_by_tester(
    conn: &Connection,
    tester_id: i64,
) -> Result<Vec<TestRequest>, DatabaseError> {
    let sql = format!("{SELECT_AGGREGATE} WHERE l.tester_id = ?1 ORDER BY r.request_id ASC");
    query_requests(conn, &sql, params![tester_id])
}

pub fn get_test_requests_by_doctor(
    conn: &Connection,
    doctor_id: i64,
) -> Result<Vec<TestRequest>, DatabaseError> {
    let sql = format!("{SELECT_AGGREGATE} WHERE c.doctor_id = ?1 ORDER BY r.request_id ASC");
    query_requests(conn, &sql, params![doctor_id])
}

/// Requests for the same phone number or email that have not reached COMPLETED.
pub fn count_open_requests_for_contact(
    conn: &Connection,
    phone_number: &str,
    email: &str,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM test_requests
         WHERE (phone_number = ?1 OR LOWER(email) = LOWER(?2)) AND status != ?3",
        params![phone_number, email, RequestStatus::Completed.as_str()],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

/// Move a request from `from` to `to`. Returns `false` when the row is not
/// (or no longer) in `from`, leaving it untouched.
pub fn compare_and_set_status(
    conn: &Connection,
    request_id: i64,
    from: RequestStatus,
    to: RequestStatus,
) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "UPDATE test_requests SET status = ?1 WHERE request_id = ?2 AND status = ?3",
        params![to.as_str(), request_id, from.as_str()],
    )?;
    Ok(changed == 1)
}

fn query_requests(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<TestRequest>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, request_row_from_rusqlite)?;

    let mut requests = Vec::new();
    for row in rows {
        requests.push(request_from_row(row?)?);
    }
    Ok(requests)
}

// Internal row type for TestRequest mapping
struct RequestRow {
    request_id: i64,
    name: String,
    age: u32,
    gender: String,
    address: String,
    phone_number: String,
    email: String,
    pin_code: u32,
    created_by_id: i64,
    created_by_name: String,
    created: String,
    status: String,
    blood_pressure: Option<String>,
    heart_beat: Option<String>,
    oxygen_level: Option<String>,
    temperature: Option<String>,
    lab_comments: Option<String>,
    result: Option<String>,
    tester_id: Option<i64>,
    tester_name: Option<String>,
    lab_updated_on: Option<String>,
    suggestion: Option<String>,
    consultation_comments: Option<String>,
    doctor_id: Option<i64>,
    doctor_name: Option<String>,
    consultation_updated_on: Option<String>,
}

fn request_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<RequestRow, rusqlite::Error> {
    Ok(RequestRow {
        request_id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        gender: row.get(3)?,
        address: row.get(4)?,
        phone_number: row.get(5)?,
        email: row.get(6)?,
        pin_code: row.get(7)?,
        created_by_id: row.get(8)?,
        created_by_name: row.get(9)?,
        created: row.get(10)?,
        status: row.get(11)?,
        blood_pressure: row.get(12)?,
        heart_beat: row.get(13)?,
        oxygen_level: row.get(14)?,
        temperature: row.get(15)?,
        lab_comments: row.get(16)?,
        result: row.get(17)?,
        tester_id: row.get(18)?,
        tester_name: row.get(19)?,
        lab_updated_on: row.get(20)?,
        suggestion: row.get(21)?,
        consultation_comments: row.get(22)?,
        doctor_id: row.get(23)?,
        doctor_name: row.get(24)?,
        consultation_updated_on: row.get(25)?,
    })
}

fn request_from_row(row: RequestRow) -> Result<TestRequest, DatabaseError> {
    let lab_result = match row.tester_id {
        Some(tester_id) => Some(LabResult {
            blood_pressure: row.blood_pressure,
            heart_beat: row.heart_beat,
            oxygen_level: row.oxygen_level,
            temperature: row.temperature,
            comments: row.lab_comments,
            result: row.result.as_deref().map(TestStatus::from_str).transpose()?,
            tester: User::new(tester_id, row.tester_name.unwrap_or_default()),
            updated_on: parse_datetime(row.lab_updated_on.as_deref())?,
        }),
        None => None,
    };

    let consultation = match row.doctor_id {
        Some(doctor_id) => Some(Consultation {
            suggestion: row
                .suggestion
                .as_deref()
                .map(DoctorSuggestion::from_str)
                .transpose()?,
            comments: row.consultation_comments,
            doctor: User::new(doctor_id, row.doctor_name.unwrap_or_default()),
            updated_on: parse_datetime(row.consultation_updated_on.as_deref())?,
        }),
        None => None,
    };

    Ok(TestRequest {
        request_id: row.request_id,
        name: row.name,
        age: row.age,
        gender: Gender::from_str(&row.gender)?,
        address: row.address,
        phone_number: row.phone_number,
        email: row.email,
        pin_code: row.pin_code,
        created_by: User::new(row.created_by_id, row.created_by_name),
        created: NaiveDate::parse_from_str(&row.created, DATE_FORMAT)
            .map_err(|e| DatabaseError::ConstraintViolation(format!("created: {e}")))?,
        status: RequestStatus::from_str(&row.status)?,
        lab_result,
        consultation,
    })
}

pub(crate) fn parse_datetime(value: Option<&str>) -> Result<NaiveDateTime, DatabaseError> {
    let value = value.ok_or_else(|| DatabaseError::ConstraintViolation("missing timestamp".into()))?;
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("timestamp {value}: {e}")))
}
