//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Audit logger: request id, method, path, status, latency
//! 2. Identity: turns upstream identity headers into `ActingUser`

pub mod audit;
pub mod identity;
