use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{propagate_request_id, span_with_request_id};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Recommendations
        .route("/recommendations", post(handlers::recommend))
        // Filter options
        .route("/options/areas", get(handlers::area_options))
        .route("/options/choices", get(handlers::choice_options))
        // Name search
        .route("/search", get(handlers::search))
        // Preference history
        .route("/preferences", get(handlers::list_preferences))
        .route("/preferences", post(handlers::save_preference))
        .route("/preferences/:id", delete(handlers::remove_preference))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(propagate_request_id))
                .layer(TraceLayer::new_for_http().make_span_with(span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
