//! API Routes
//!
//! Configures the Axum router with all endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, get_handler, health_handler, index_handler, info_handler,
    ping_status_handler, put_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /` - Greeting
/// - `GET /health` - Health check including ping status
/// - `GET /ping-status` - Keep-alive ping job status
/// - `GET /cache` - Cache size and settings
/// - `PUT /cache` - Store a key-value pair
/// - `DELETE /cache` - Remove every entry
/// - `GET /cache/:key` - Retrieve a value by key
/// - `DELETE /cache/:key` - Delete a key
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/ping-status", get(ping_status_handler))
        .route(
            "/cache",
            get(info_handler).put(put_handler).delete(clear_handler),
        )
        .route("/cache/:key", get(get_handler).delete(delete_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
