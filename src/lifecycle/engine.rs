//! Request lifecycle engine: the four status transitions.
//!
//! Every operation runs in one SQLite transaction: look up the request in
//! the status the operation starts from, write the owned lab result or
//! consultation, compare-and-swap the status, append a flow entry, commit.
//! A request that moved in the meantime fails the swap and nothing is kept.

use chrono::{NaiveDateTime, Timelike, Utc};
use rusqlite::Connection;

use super::error::LifecycleError;
use super::states::Transition;
use super::validation::{
    validate_consultation, validate_lab_result, CreateConsultationRequest, CreateLabResult,
};
use crate::db::{self, DatabaseError};
use crate::models::*;

/// Current UTC time at storage precision.
pub fn utc_now() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Drives test requests through their lifecycle against one connection.
///
/// The acting user is always passed in explicitly; the engine never looks
/// up a "current user".
pub struct RequestLifecycleEngine<'c> {
    pub(super) conn: &'c Connection,
    pub(super) clock: fn() -> NaiveDateTime,
}

impl<'c> RequestLifecycleEngine<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            clock: utc_now,
        }
    }

    /// Replace the time source (tests pin timestamps with this).
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// INITIATED → LAB_TEST_IN_PROGRESS. The tester gets an empty lab result.
    pub fn assign_for_lab_test(
        &self,
        request_id: i64,
        tester: &User,
    ) -> Result<TestRequest, LifecycleError> {
        self.transition(Transition::AssignForLabTest, request_id, tester, |conn, _, now| {
            db::upsert_lab_result(conn, request_id, &LabResult::assigned_to(tester.clone(), now))
        })
    }

    /// LAB_TEST_IN_PROGRESS → LAB_TEST_COMPLETED, whatever the outcome.
    pub fn update_lab_test(
        &self,
        request_id: i64,
        input: &CreateLabResult,
        tester: &User,
    ) -> Result<TestRequest, LifecycleError> {
        let outcome = validate_lab_result(input)?;

        self.transition(Transition::UpdateLabTest, request_id, tester, |conn, current, now| {
            let assigned = current
                .lab_result
                .as_ref()
                .map(|lab| lab.tester.clone())
                .unwrap_or_else(|| tester.clone());
            let lab = LabResult {
                blood_pressure: input.blood_pressure.clone(),
                heart_beat: input.heart_beat.clone(),
                oxygen_level: input.oxygen_level.clone(),
                temperature: input.temperature.clone(),
                comments: input.comments.clone(),
                result: Some(outcome),
                tester: assigned,
                updated_on: now,
            };
            db::upsert_lab_result(conn, request_id, &lab)
        })
    }

    /// LAB_TEST_COMPLETED → DIAGNOSIS_IN_PROCESS. The doctor gets an empty consultation.
    pub fn assign_for_consultation(
        &self,
        request_id: i64,
        doctor: &User,
    ) -> Result<TestRequest, LifecycleError> {
        self.transition(Transition::AssignForConsultation, request_id, doctor, |conn, _, now| {
            db::upsert_consultation(
                conn,
                request_id,
                &Consultation::assigned_to(doctor.clone(), now),
            )
        })
    }

    /// DIAGNOSIS_IN_PROCESS → COMPLETED.
    pub fn update_consultation(
        &self,
        request_id: i64,
        input: &CreateConsultationRequest,
        doctor: &User,
    ) -> Result<TestRequest, LifecycleError> {
        let suggestion = validate_consultation(input)?;

        self.transition(Transition::UpdateConsultation, request_id, doctor, |conn, current, now| {
            let assigned = current
                .consultation
                .as_ref()
                .map(|c| c.doctor.clone())
                .unwrap_or_else(|| doctor.clone());
            let consultation = Consultation {
                suggestion: Some(suggestion),
                comments: input.comments.clone(),
                doctor: assigned,
                updated_on: now,
            };
            db::upsert_consultation(conn, request_id, &consultation)
        })
    }

    fn transition<F>(
        &self,
        transition: Transition,
        request_id: i64,
        actor: &User,
        apply: F,
    ) -> Result<TestRequest, LifecycleError>
    where
        F: FnOnce(&Connection, &TestRequest, NaiveDateTime) -> Result<(), DatabaseError>,
    {
        let (from, to) = (transition.from(), transition.to());
        let tx = self.conn.unchecked_transaction()?;

        let current = match db::get_test_request_in_status(&tx, request_id, from)? {
            Some(request) => request,
            None => {
                tracing::warn!(request_id, user_id = actor.id, %transition, expected = %from, "Transition rejected: invalid id or state");
                return Err(LifecycleError::NotInState {
                    request_id,
                    expected: from,
                });
            }
        };

        let now = (self.clock)();
        apply(&*tx, &current, now)?;

        if !db::compare_and_set_status(&tx, request_id, from, to)? {
            // Dropping `tx` rolls back the sub-entity write.
            tracing::warn!(request_id, %transition, "Transition lost race, status changed concurrently");
            return Err(LifecycleError::NotInState {
                request_id,
                expected: from,
            });
        }

        db::insert_flow_entry(&tx, request_id, Some(from), to, actor, now)?;

        let updated = db::get_test_request(&tx, request_id)?
            .ok_or(LifecycleError::NotFound { request_id })?;
        tx.commit()?;

        tracing::info!(request_id, user_id = actor.id, %from, %to, "Test request transitioned");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::lifecycle::validation::CreateTestRequest;
    use crate::models::enums::*;

    fn fixed_clock() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-03-01 10:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn person() -> User {
        User::new(11, "ravi")
    }

    fn tester() -> User {
        User::new(7, "ravitest")
    }

    fn doctor() -> User {
        User::new(2, "doctor")
    }

    fn new_request(engine: &RequestLifecycleEngine<'_>) -> i64 {
        engine
            .create_request(
                &CreateTestRequest {
                    name: "Ravi".into(),
                    age: 39,
                    gender: Gender::Male,
                    address: "Some address".into(),
                    phone_number: "4564654560".into(),
                    email: "ravi@ravi.com".into(),
                    pin_code: 4545,
                },
                &person(),
            )
            .unwrap()
            .request_id
    }

    fn lab_input(result: Option<TestStatus>) -> CreateLabResult {
        CreateLabResult {
            blood_pressure: Some("111".into()),
            heart_beat: Some("108".into()),
            oxygen_level: Some("92".into()),
            temperature: Some("108".into()),
            comments: Some("not ok".into()),
            result,
        }
    }

    fn consultation_input(suggestion: Option<DoctorSuggestion>) -> CreateConsultationRequest {
        CreateConsultationRequest {
            suggestion,
            comments: Some("Stay at home".into()),
        }
    }

    #[test]
    fn assign_for_lab_test_moves_initiated_request() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn).with_clock(fixed_clock);
        let id = new_request(&engine);

        let result = engine.assign_for_lab_test(id, &tester()).unwrap();

        assert_eq!(result.request_id, id);
        assert_eq!(result.status, RequestStatus::LabTestInProgress);
        let lab = result.lab_result.expect("lab result created");
        assert_eq!(lab.tester, tester());
        assert_eq!(lab.result, None);
        assert_eq!(lab.updated_on, fixed_clock());
    }

    #[test]
    fn invalid_id_fails_every_operation() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn);

        let errors = [
            engine.assign_for_lab_test(-34, &tester()).unwrap_err(),
            engine
                .update_lab_test(-34, &lab_input(Some(TestStatus::Positive)), &tester())
                .unwrap_err(),
            engine.assign_for_consultation(-34, &doctor()).unwrap_err(),
            engine
                .update_consultation(
                    -5,
                    &consultation_input(Some(DoctorSuggestion::HomeQuarantine)),
                    &doctor(),
                )
                .unwrap_err(),
        ];
        for err in errors {
            assert!(err.is_not_found(), "{err:?}");
            assert!(err.to_string().contains("Invalid ID"));
        }
    }

    #[test]
    fn update_lab_test_records_positive_outcome() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn);
        let id = new_request(&engine);
        engine.assign_for_lab_test(id, &tester()).unwrap();

        let result = engine
            .update_lab_test(id, &lab_input(Some(TestStatus::Positive)), &tester())
            .unwrap();

        assert_eq!(result.status, RequestStatus::LabTestCompleted);
        let lab = result.lab_result.unwrap();
        assert_eq!(lab.result, Some(TestStatus::Positive));
        assert_eq!(lab.blood_pressure.as_deref(), Some("111"));
        assert_eq!(lab.comments.as_deref(), Some("not ok"));
    }

    #[test]
    fn negative_outcome_lands_on_same_status() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn);
        let id = new_request(&engine);
        engine.assign_for_lab_test(id, &tester()).unwrap();

        let result = engine
            .update_lab_test(id, &lab_input(Some(TestStatus::Negative)), &tester())
            .unwrap();

        assert_eq!(result.status, RequestStatus::LabTestCompleted);
        assert_eq!(result.lab_result.unwrap().result, Some(TestStatus::Negative));
    }

    #[test]
    fn update_lab_test_without_result_is_validation_error() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn);
        let id = new_request(&engine);
        engine.assign_for_lab_test(id, &tester()).unwrap();

        for request_id in [id, -34] {
            let err = engine
                .update_lab_test(request_id, &lab_input(None), &tester())
                .unwrap_err();
            assert!(matches!(err, LifecycleError::Validation { field: "result", .. }));
            assert!(err.to_string().contains("constraint violation"));
        }

        let unchanged = db::get_test_request(&conn, id).unwrap().unwrap();
        assert_eq!(unchanged.status, RequestStatus::LabTestInProgress);
    }

    #[test]
    fn double_assignment_is_rejected() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn);
        let id = new_request(&engine);
        engine.assign_for_lab_test(id, &tester()).unwrap();

        let err = engine.assign_for_lab_test(id, &User::new(8, "other")).unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::NotInState { expected: RequestStatus::Initiated, .. }
        ));

        let stored = db::get_test_request(&conn, id).unwrap().unwrap();
        assert_eq!(stored.lab_result.unwrap().tester, tester());
    }

    #[test]
    fn operations_out_of_order_are_rejected() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn);
        let id = new_request(&engine);

        assert!(engine.assign_for_consultation(id, &doctor()).unwrap_err().is_not_found());
        assert!(engine
            .update_lab_test(id, &lab_input(Some(TestStatus::Positive)), &tester())
            .unwrap_err()
            .is_not_found());

        let stored = db::get_test_request(&conn, id).unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Initiated);
        assert!(stored.consultation.is_none());
    }

    #[test]
    fn consultation_flow_completes_request() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn);
        let id = new_request(&engine);
        engine.assign_for_lab_test(id, &tester()).unwrap();
        engine
            .update_lab_test(id, &lab_input(Some(TestStatus::Positive)), &tester())
            .unwrap();

        let assigned = engine.assign_for_consultation(id, &doctor()).unwrap();
        assert_eq!(assigned.status, RequestStatus::DiagnosisInProcess);
        assert!(assigned.consultation.is_some());

        let completed = engine
            .update_consultation(
                id,
                &consultation_input(Some(DoctorSuggestion::HomeQuarantine)),
                &doctor(),
            )
            .unwrap();
        assert_eq!(completed.request_id, id);
        assert_eq!(completed.status, RequestStatus::Completed);
        let consultation = completed.consultation.unwrap();
        assert_eq!(consultation.suggestion, Some(DoctorSuggestion::HomeQuarantine));
        assert_eq!(consultation.doctor, doctor());
        // Lab result survives the consultation
        assert_eq!(completed.lab_result.unwrap().result, Some(TestStatus::Positive));
    }

    #[test]
    fn update_consultation_without_suggestion_mentions_field() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn);

        let err = engine
            .update_consultation(1, &consultation_input(None), &doctor())
            .unwrap_err();
        assert!(err.to_string().contains("suggestion"));
    }

    #[test]
    fn completed_request_accepts_no_further_transition() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn);
        let id = new_request(&engine);
        engine.assign_for_lab_test(id, &tester()).unwrap();
        engine
            .update_lab_test(id, &lab_input(Some(TestStatus::Negative)), &tester())
            .unwrap();
        engine.assign_for_consultation(id, &doctor()).unwrap();
        engine
            .update_consultation(id, &consultation_input(Some(DoctorSuggestion::NoIssues)), &doctor())
            .unwrap();

        assert!(engine.assign_for_lab_test(id, &tester()).is_err());
        assert!(engine.assign_for_consultation(id, &doctor()).is_err());
        assert!(engine
            .update_consultation(id, &consultation_input(Some(DoctorSuggestion::Admit)), &doctor())
            .is_err());
    }

    #[test]
    fn each_transition_appends_one_flow_entry() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn).with_clock(fixed_clock);
        let id = new_request(&engine);
        engine.assign_for_lab_test(id, &tester()).unwrap();
        engine
            .update_lab_test(id, &lab_input(Some(TestStatus::Positive)), &tester())
            .unwrap();
        // Rejected call must not log
        let _ = engine.assign_for_lab_test(id, &tester());

        let flow = db::get_flow_for_request(&conn, id).unwrap();
        let steps: Vec<_> = flow.iter().map(|f| (f.from_status, f.to_status)).collect();
        assert_eq!(
            steps,
            vec![
                (None, RequestStatus::Initiated),
                (Some(RequestStatus::Initiated), RequestStatus::LabTestInProgress),
                (Some(RequestStatus::LabTestInProgress), RequestStatus::LabTestCompleted),
            ]
        );
        assert_eq!(flow[1].changed_by, tester());
        assert_eq!(flow[2].happened_on, fixed_clock());
    }

    #[test]
    fn status_moved_mid_transition_rolls_back_lab_result() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn);
        let id = new_request(&engine);
        // Another writer completes the request between our lookup and the swap
        conn.execute_batch(
            "CREATE TRIGGER steal_request AFTER INSERT ON lab_results
             BEGIN
                 UPDATE test_requests SET status = 'COMPLETED' WHERE request_id = NEW.request_id;
             END;",
        )
        .unwrap();

        let err = engine.assign_for_lab_test(id, &tester()).unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::NotInState { expected: RequestStatus::Initiated, .. }
        ));

        conn.execute_batch("DROP TRIGGER steal_request").unwrap();
        let stored = db::get_test_request(&conn, id).unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Initiated);
        assert!(stored.lab_result.is_none());
        assert_eq!(db::get_flow_for_request(&conn, id).unwrap().len(), 1);
    }

    #[test]
    fn status_moved_mid_transition_rolls_back_consultation() {
        let conn = open_memory_database().unwrap();
        let engine = RequestLifecycleEngine::new(&conn);
        let id = new_request(&engine);
        engine.assign_for_lab_test(id, &tester()).unwrap();
        engine
            .update_lab_test(id, &lab_input(Some(TestStatus::Negative)), &tester())
            .unwrap();
        conn.execute_batch(
            "CREATE TRIGGER steal_request AFTER INSERT ON consultations
             BEGIN
                 UPDATE test_requests SET status = 'COMPLETED' WHERE request_id = NEW.request_id;
             END;",
        )
        .unwrap();

        let err = engine.assign_for_consultation(id, &doctor()).unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::NotInState { expected: RequestStatus::LabTestCompleted, .. }
        ));

        conn.execute_batch("DROP TRIGGER steal_request").unwrap();
        let stored = db::get_test_request(&conn, id).unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::LabTestCompleted);
        assert!(stored.consultation.is_none());
        assert_eq!(db::get_flow_for_request(&conn, id).unwrap().len(), 3);
    }
}
