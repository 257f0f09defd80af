//! HTTP API over the test request lifecycle.
//!
//! Routes are nested under `/api/`. Workflow routes require the caller's
//! identity (forwarded by the upstream authentication layer); the router
//! is composable: `api_router()` returns a `Router` that can be mounted
//! on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{serve, start_api_server, ApiServer, ApiSession};
pub use types::{ActingUser, ApiContext};
