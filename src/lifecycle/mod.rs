//! Test request lifecycle: status machine, intake, transitions, queries.

mod engine;
mod error;
mod intake;
pub mod query;
mod states;
mod validation;

pub use engine::{utc_now, RequestLifecycleEngine};
pub use error::LifecycleError;
pub use states::{is_terminal, next_status, status_index, Transition, REQUEST_STATUSES};
pub use validation::{
    validate_consultation, validate_lab_result, validate_test_request, CreateConsultationRequest,
    CreateLabResult, CreateTestRequest,
};
