//! Shared types for the API layer.

use std::sync::Arc;

use crate::core_state::CoreState;
use crate::models::User;

/// Header carrying the authenticated user's numeric id.
pub const USER_ID_HEADER: &str = "X-User-Id";
/// Header carrying the authenticated user's name.
pub const USER_NAME_HEADER: &str = "X-User-Name";
/// Correlation id echoed on every response.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Identity of the caller, injected into request extensions by the
/// identity middleware. Handlers pass it explicitly to the engine.
#[derive(Debug, Clone)]
pub struct ActingUser(pub User);
