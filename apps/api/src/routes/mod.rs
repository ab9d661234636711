pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::workflow::handlers;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/events", post(handlers::handle_event))
        // Wizard
        .route(
            "/api/v1/sessions/:id/wizard",
            post(handlers::handle_wizard_input),
        )
        .route(
            "/api/v1/sessions/:id/wizard/resume",
            post(handlers::handle_resume_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Results
        .route(
            "/api/v1/sessions/:id/dashboard",
            get(handlers::handle_dashboard),
        )
        .route("/api/v1/sessions/:id/export", get(handlers::handle_export))
        .with_state(state)
}
