use super::events;
use super::health::health_check;
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/api/events/:id", get(events::get_event))
        .route("/api/events/:id/apply", post(events::submit_application))
        .route(
            "/api/events/:id/applications",
            get(events::list_applications),
        )
        .route("/api/events/:id/lottery", post(events::execute_lottery))
        .route("/api/events/:id/results", get(events::get_results))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
