//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/signup", post(handlers::signup))
        .route("/api/login", post(handlers::login))
        .route("/api/grades", post(handlers::submit_grade))
        .route("/api/grades/{student_id}", get(handlers::student_grades))
        // Open to any caller; there is no student/teacher distinction.
        .route("/api/teacher/all-grades", get(handlers::all_grades))
        // The browser frontend is served from another origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
