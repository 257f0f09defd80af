//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. Cache-Control header → 2. Audit logger → 3. Identity (workflow routes only)

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, put};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router over shared application state.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    // Workflow routes: every handler needs an `ActingUser`
    //
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let workflow = Router::new()
        .route(
            "/testrequests",
            get(endpoints::requests::mine).post(endpoints::requests::create),
        )
        .route("/testrequests/:id", get(endpoints::requests::detail))
        .route("/testrequests/:id/flow", get(endpoints::requests::flow))
        .route("/labrequests", get(endpoints::labs::assigned))
        .route(
            "/labrequests/to-be-tested",
            get(endpoints::labs::to_be_tested),
        )
        .route("/labrequests/assign/:id", put(endpoints::labs::assign))
        .route("/labrequests/update/:id", put(endpoints::labs::update))
        .route("/consultations", get(endpoints::consultations::assigned))
        .route(
            "/consultations/in-queue",
            get(endpoints::consultations::in_queue),
        )
        .route(
            "/consultations/assign/:id",
            put(endpoints::consultations::assign),
        )
        .route(
            "/consultations/update/:id",
            put(endpoints::consultations::update),
        )
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::identity::require_identity));

    let open = Router::new()
        .route("/health", get(endpoints::health::check))
        .with_state(ctx);

    Router::new()
        .nest("/api", workflow.merge(open))
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
