//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // Company routes
        .route(
            "/api/companies",
            get(handlers::list_companies).post(handlers::create_company),
        )
        .route("/api/companies/search", get(handlers::search_companies))
        .route("/api/companies/stats", get(handlers::stats))
        .route(
            "/api/companies/:id",
            get(handlers::get_company)
                .put(handlers::update_company)
                .delete(handlers::delete_company),
        )
        // Ingestion routes
        .route("/api/sources", get(handlers::sources))
        .route("/api/ingest", post(handlers::ingest))
        // Add middleware
        .layer(cors)
        // Add state
        .with_state(state)
}
