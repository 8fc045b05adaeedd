//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Application routes are nested under `/api/`; `/health` stays at the root.
//!
//! Middleware stack (outermost → innermost):
//! 1. CORS → 2. Rate limiter → 3. Auth validator → 4. Audit logger

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router with all endpoints and the full middleware stack.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);
    build_router(ctx)
}

/// Build router from pre-constructed `ApiContext`.
///
/// Used by integration tests that need access to the shared `ApiContext`
/// (e.g. to inspect the prediction buffer directly).
#[cfg(test)]
pub(crate) fn api_router_with_ctx(ctx: ApiContext) -> Router {
    build_router(ctx)
}

fn build_router(ctx: ApiContext) -> Router {
    // Protected routes — require auth + full middleware stack
    //
    // Layers are applied from bottom (innermost) to top (outermost):
    //   Extension (outermost) → Rate limit → Auth → Audit (innermost) → Handler
    //
    // Extension must be outermost so all middleware can access ApiContext.
    // Routes with state — .with_state() converts Router<ApiContext> → Router<()>
    // so middleware layers (which use from_fn with state=()) are compatible.
    let protected = Router::new()
        .route("/logout", post(endpoints::auth::logout))
        .route("/dashboard", get(endpoints::auth::dashboard))
        .route(
            "/patients",
            post(endpoints::patients::create).get(endpoints::patients::list),
        )
        .route("/patients/:id", get(endpoints::patients::detail))
        .route(
            "/patients/:id/medical-history",
            post(endpoints::patients::add_history).get(endpoints::patients::history),
        )
        .route("/symptoms/check", post(endpoints::symptoms::check))
        .route("/analytics/predictive", post(endpoints::analytics::predictive))
        .route("/analytics/triage", get(endpoints::analytics::triage))
        .route("/analytics/trends", get(endpoints::analytics::trends))
        .route("/engine/status", get(endpoints::engine::status))
        .route("/engine/models", get(endpoints::engine::models))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        .layer(axum::middleware::from_fn(middleware::rate::limit))
        .layer(axum::Extension(ctx.clone()));

    // Unprotected routes (rate-limited only, no auth required)
    let unprotected = Router::new()
        .route("/signup", post(endpoints::auth::signup))
        .route("/login", post(endpoints::auth::login))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::rate::limit))
        .layer(axum::Extension(ctx.clone()));

    // Root health check (rate-limited, no auth)
    let health = Router::new()
        .route("/health", get(endpoints::health::check))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::rate::limit))
        .layer(axum::Extension(ctx));

    Router::new()
        .nest("/api", protected)
        .nest("/api", unprotected)
        .merge(health)
        .layer(CorsLayer::permissive())
}
