use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::enums::{DoctorSuggestion, Gender, RequestStatus, TestStatus};
use super::user::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRequest {
    pub request_id: i64,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub address: String,
    pub phone_number: String,
    pub email: String,
    pub pin_code: u32,
    pub created_by: User,
    pub created: NaiveDate,
    pub status: RequestStatus,
    pub lab_result: Option<LabResult>,
    pub consultation: Option<Consultation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    pub blood_pressure: Option<String>,
    pub heart_beat: Option<String>,
    pub oxygen_level: Option<String>,
    pub temperature: Option<String>,
    pub comments: Option<String>,
    /// `None` until the tester submits the outcome.
    pub result: Option<TestStatus>,
    pub tester: User,
    pub updated_on: NaiveDateTime,
}

impl LabResult {
    /// Empty lab result created when a tester takes the request.
    pub fn assigned_to(tester: User, now: NaiveDateTime) -> Self {
        Self {
            blood_pressure: None,
            heart_beat: None,
            oxygen_level: None,
            temperature: None,
            comments: None,
            result: None,
            tester,
            updated_on: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    /// `None` until the doctor finalizes the consultation.
    pub suggestion: Option<DoctorSuggestion>,
    pub comments: Option<String>,
    pub doctor: User,
    pub updated_on: NaiveDateTime,
}

impl Consultation {
    pub fn assigned_to(doctor: User, now: NaiveDateTime) -> Self {
        Self {
            suggestion: None,
            comments: None,
            doctor,
            updated_on: now,
        }
    }
}
