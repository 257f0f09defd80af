//! API endpoint handlers.
//!
//! Each module corresponds to one actor's view of the workflow.
//! Handlers lock the shared connection, call into `lifecycle`, and
//! return the updated aggregate as JSON.

pub mod consultations;
pub mod health;
pub mod labs;
pub mod requests;
