//! Input payloads for lifecycle operations and their validation rules.

use serde::{Deserialize, Serialize};

use super::error::LifecycleError;
use crate::models::enums::{DoctorSuggestion, Gender, TestStatus};

const MAX_AGE: u32 = 150;
const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 7..=15;

/// Vitals and outcome submitted by a tester.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLabResult {
    #[serde(default)]
    pub blood_pressure: Option<String>,
    #[serde(default)]
    pub heart_beat: Option<String>,
    #[serde(default)]
    pub oxygen_level: Option<String>,
    #[serde(default)]
    pub temperature: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub result: Option<TestStatus>,
}

/// Suggestion submitted by a doctor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateConsultationRequest {
    #[serde(default)]
    pub suggestion: Option<DoctorSuggestion>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// A person's application for a test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTestRequest {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub address: String,
    pub phone_number: String,
    pub email: String,
    pub pin_code: u32,
}

/// The outcome is the only mandatory field of a lab submission.
pub fn validate_lab_result(input: &CreateLabResult) -> Result<TestStatus, LifecycleError> {
    input.result.ok_or_else(|| LifecycleError::missing("result"))
}

pub fn validate_consultation(
    input: &CreateConsultationRequest,
) -> Result<DoctorSuggestion, LifecycleError> {
    input.suggestion.ok_or_else(|| LifecycleError::missing("suggestion"))
}

/// Reports the first offending field.
pub fn validate_test_request(input: &CreateTestRequest) -> Result<(), LifecycleError> {
    if input.name.trim().is_empty() {
        return Err(LifecycleError::missing("name"));
    }
    if input.age == 0 || input.age > MAX_AGE {
        return Err(LifecycleError::invalid(
            "age",
            format!("must be between 1 and {MAX_AGE}"),
        ));
    }
    if input.address.trim().is_empty() {
        return Err(LifecycleError::missing("address"));
    }

    let phone = input.phone_number.trim();
    if !phone.chars().all(|c| c.is_ascii_digit()) || !PHONE_DIGITS.contains(&phone.len()) {
        return Err(LifecycleError::invalid(
            "phone_number",
            format!(
                "must be {} to {} digits",
                PHONE_DIGITS.start(),
                PHONE_DIGITS.end()
            ),
        ));
    }

    let email = input.email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
        _ => return Err(LifecycleError::invalid("email", "must be a valid address")),
    }

    if input.pin_code == 0 {
        return Err(LifecycleError::invalid("pin_code", "must be positive"));
    }

    Ok(())
}
