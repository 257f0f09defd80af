//! Repository layer: entity-scoped database operations.
//!
//! A test request is stored across `test_requests` plus its owned
//! `lab_results` / `consultations` rows; reads always return the joined
//! aggregate.

mod consultation;
mod flow;
mod lab_result;
mod test_request;

// Re-export all public items from sub-modules
pub use consultation::*;
pub use flow::*;
pub use lab_result::*;
pub use test_request::*;
