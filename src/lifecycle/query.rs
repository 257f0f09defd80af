//! Read-side lookups over test requests.

use rusqlite::Connection;

use super::error::LifecycleError;
use crate::db;
use crate::models::enums::RequestStatus;
use crate::models::*;

/// Requests currently in `status`, oldest first.
pub fn find_by_status(
    conn: &Connection,
    status: RequestStatus,
) -> Result<Vec<TestRequest>, LifecycleError> {
    Ok(db::get_test_requests_by_status(conn, status)?)
}

pub fn find_by_creator(conn: &Connection, user: &User) -> Result<Vec<TestRequest>, LifecycleError> {
    Ok(db::get_test_requests_by_creator(conn, user.id)?)
}

/// Requests whose lab test was taken by `tester`, in any later status.
pub fn find_by_tester(conn: &Connection, tester: &User) -> Result<Vec<TestRequest>, LifecycleError> {
    Ok(db::get_test_requests_by_tester(conn, tester.id)?)
}

pub fn find_by_doctor(conn: &Connection, doctor: &User) -> Result<Vec<TestRequest>, LifecycleError> {
    Ok(db::get_test_requests_by_doctor(conn, doctor.id)?)
}

pub fn get_request(conn: &Connection, request_id: i64) -> Result<TestRequest, LifecycleError> {
    db::get_test_request(conn, request_id)?.ok_or(LifecycleError::NotFound { request_id })
}

/// Status history of one request; unknown ids are an error, not an empty log.
pub fn get_flow(conn: &Connection, request_id: i64) -> Result<Vec<TestRequestFlow>, LifecycleError> {
    if db::get_test_request(conn, request_id)?.is_none() {
        return Err(LifecycleError::NotFound { request_id });
    }
    Ok(db::get_flow_for_request(conn, request_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::lifecycle::{CreateTestRequest, RequestLifecycleEngine};
    use crate::models::enums::Gender;

    fn seed(engine: &RequestLifecycleEngine<'_>, phone: &str, email: &str) -> i64 {
        engine
            .create_request(
                &CreateTestRequest {
                    name: "Ravi".into(),
                    age: 39,
                    gender: Gender::Male,
                    address: "Some address".into(),
                    phone_number: phone.into(),
                    email: email.into(),
                    pin_code: 4545,
                },
                &User::new(11, "ravi"),
            )
            .unwrap()
            .request_id
    }

    #[test]
    fn find_by_status_tracks_lifecycle_stage() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn);
        let first = seed(&engine, "1111111111", "a@example.com");
        let second = seed(&engine, "2222222222", "b@example.com");
        let tester = User::new(7, "ravitest");
        engine.assign_for_lab_test(second, &tester).unwrap();

        let initiated = find_by_status(&conn, RequestStatus::Initiated).unwrap();
        assert_eq!(initiated.len(), 1);
        assert_eq!(initiated[0].request_id, first);

        let in_progress = find_by_status(&conn, RequestStatus::LabTestInProgress).unwrap();
        assert_eq!(in_progress[0].request_id, second);

        assert_eq!(find_by_tester(&conn, &tester).unwrap().len(), 1);
        assert_eq!(find_by_creator(&conn, &User::new(11, "ravi")).unwrap().len(), 2);
        assert!(find_by_doctor(&conn, &User::new(2, "doctor")).unwrap().is_empty());
    }

    #[test]
    fn unknown_request_is_invalid_id() {
        let conn = open_memory_database().unwrap();
        let err = get_request(&conn, -34).unwrap_err();
        assert_eq!(err.to_string(), "Invalid ID");
        assert!(get_flow(&conn, -34).unwrap_err().is_not_found());
    }

    #[test]
    fn flow_of_new_request_has_creation_entry() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn);
        let id = seed(&engine, "1111111111", "a@example.com");

        let flow = get_flow(&conn, id).unwrap();
        assert_eq!(flow.len(), 1);
        assert_eq!(flow[0].from_status, None);
        assert_eq!(flow[0].to_status, RequestStatus::Initiated);
    }
}
