//! API Routes
//!
//! Configures the Axum router with all navigation cache endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    get_handler, health_handler, invalidate_handler, load_module_handler, module_handler,
    modules_handler, navigate_handler, preload_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /cache` - Store a JSON value with optional TTL
/// - `GET /cache/:key` - Read a fresh value
/// - `DELETE /cache/:key` - Invalidate a key
/// - `POST /navigate` - Report a navigation, schedule adjacent preloads
/// - `POST /preload` - Eagerly preload a list of modules
/// - `GET /modules` - Load state of every known module
/// - `GET /modules/:name` - Load state of one module
/// - `POST /modules/:name/load` - Load a module on demand
/// - `GET /stats` - Cache and module statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: the frontend runs on another origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache", put(set_handler))
        .route("/cache/:key", get(get_handler).delete(invalidate_handler))
        .route("/navigate", post(navigate_handler))
        .route("/preload", post(preload_handler))
        .route("/modules", get(modules_handler))
        .route("/modules/:name", get(module_handler))
        .route("/modules/:name/load", post(load_module_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
