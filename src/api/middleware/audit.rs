//! Access audit middleware.
//!
//! Records every request with nurse id, method, path and response status.
//! Runs innermost (after auth has injected NurseContext).

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::{ApiContext, NurseContext};

/// Log API access for the audit trail.
/// Accesses `ApiContext` from request extensions.
pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let ctx = req.extensions().get::<ApiContext>().cloned();
    let nurse_id = req
        .extensions()
        .get::<NurseContext>()
        .map(|n| n.nurse_id);

    let response = next.run(req).await;

    if let Some(ctx) = ctx {
        let status = response.status().as_u16();
        ctx.core
            .log_access(nurse_id, &format!("{method} {path}"), &format!("status:{status}"));
    }

    response
}
