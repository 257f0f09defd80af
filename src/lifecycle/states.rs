//! Test request status machine.
//!
//! The lifecycle is a linear progression:
//! INITIATED → LAB_TEST_IN_PROGRESS → LAB_TEST_COMPLETED → DIAGNOSIS_IN_PROCESS → COMPLETED

use std::fmt;

use crate::models::enums::RequestStatus;

/// Canonical ordering of request statuses. Source of truth for "forward".
pub const REQUEST_STATUSES: &[RequestStatus] = &[
    RequestStatus::Initiated,
    RequestStatus::LabTestInProgress,
    RequestStatus::LabTestCompleted,
    RequestStatus::DiagnosisInProcess,
    RequestStatus::Completed,
];

/// 0-based position of a status in the lifecycle.
pub fn status_index(status: RequestStatus) -> usize {
    REQUEST_STATUSES
        .iter()
        .position(|&s| s == status)
        .unwrap_or(usize::MAX)
}

/// The single status a request may advance to, or `None` once COMPLETED.
pub fn next_status(current: RequestStatus) -> Option<RequestStatus> {
    let index = status_index(current);
    REQUEST_STATUSES.get(index.checked_add(1)?).copied()
}

pub fn is_terminal(status: RequestStatus) -> bool {
    next_status(status).is_none()
}

/// The four operations that move a request forward, one per lifecycle edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    AssignForLabTest,
    UpdateLabTest,
    AssignForConsultation,
    UpdateConsultation,
}

impl Transition {
    pub const ALL: [Transition; 4] = [
        Transition::AssignForLabTest,
        Transition::UpdateLabTest,
        Transition::AssignForConsultation,
        Transition::UpdateConsultation,
    ];

    /// Status the request must be in for this operation.
    pub fn from(self) -> RequestStatus {
        match self {
            Transition::AssignForLabTest => RequestStatus::Initiated,
            Transition::UpdateLabTest => RequestStatus::LabTestInProgress,
            Transition::AssignForConsultation => RequestStatus::LabTestCompleted,
            Transition::UpdateConsultation => RequestStatus::DiagnosisInProcess,
        }
    }

    /// Status the request lands in.
    pub fn to(self) -> RequestStatus {
        match self {
            Transition::AssignForLabTest => RequestStatus::LabTestInProgress,
            Transition::UpdateLabTest => RequestStatus::LabTestCompleted,
            Transition::AssignForConsultation => RequestStatus::DiagnosisInProcess,
            Transition::UpdateConsultation => RequestStatus::Completed,
        }
    }

    /// The operation available from `status`, if any.
    pub fn starting_at(status: RequestStatus) -> Option<Transition> {
        Transition::ALL.into_iter().find(|t| t.from() == status)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Transition::AssignForLabTest => "assign_for_lab_test",
            Transition::UpdateLabTest => "update_lab_test",
            Transition::AssignForConsultation => "assign_for_consultation",
            Transition::UpdateConsultation => "update_consultation",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
