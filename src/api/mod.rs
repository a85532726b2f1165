//! API Module
//!
//! HTTP handlers and routing. The handlers are thin callers of the cache
//! and the ping service.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
