//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive, the single frontend may be served from anywhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.config.server.body_limit_bytes;

    // Static segments are matched before `{property_id}`.
    let api = Router::new()
        .route(
            "/properties",
            get(handlers::list_properties).post(handlers::create_property),
        )
        .route("/properties/bulk", post(handlers::create_properties_bulk))
        .route("/properties/upload", post(handlers::upload_properties_csv))
        .route("/properties/search", get(handlers::search_properties))
        .route("/properties/statistics", get(handlers::get_statistics))
        .route("/properties/outliers", get(handlers::get_outliers))
        .route("/properties/insights", get(handlers::get_historical_insights))
        .route(
            "/properties/{property_id}",
            get(handlers::get_property)
                .put(handlers::update_property)
                .delete(handlers::delete_property),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
