use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Rehearsal lifecycle
        .route("/rehearsals", post(handlers::create_rehearsal))
        .route(
            "/rehearsals/:id",
            get(handlers::get_rehearsal).delete(handlers::delete_rehearsal),
        )
        .route("/rehearsals/:id/start", post(handlers::start_rehearsal))
        .route("/rehearsals/:id/pause", post(handlers::pause_rehearsal))
        .route("/rehearsals/:id/resume", post(handlers::resume_rehearsal))
        .route("/rehearsals/:id/finish", post(handlers::finish_rehearsal))
        .route("/rehearsals/:id/reset", post(handlers::reset_rehearsal))
        // Browser front-ends call from another origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
