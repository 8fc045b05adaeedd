//! HTTP API layer: router, middleware stack, endpoints and error mapping.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_server, ServerHandle};
