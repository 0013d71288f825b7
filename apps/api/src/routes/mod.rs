pub mod auth;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    // Student-facing API
    let public = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/jobs", get(handlers::handle_list_jobs))
        .route("/api/v1/jobs/:job_id/apply", post(handlers::handle_apply))
        .route(
            "/api/v1/students/:email/applications",
            get(handlers::handle_student_applications),
        );

    // Placement team API
    let placement = Router::new()
        .route("/api/v1/jobs", post(handlers::handle_create_job))
        .route("/api/v1/jobs/:job_id", delete(handlers::handle_delete_job))
        .route(
            "/api/v1/jobs/:job_id/applications",
            get(handlers::handle_job_applications),
        )
        .route(
            "/api/v1/jobs/:job_id/shortlist",
            post(handlers::handle_shortlist),
        )
        .route(
            "/api/v1/applications/status",
            put(handlers::handle_update_status),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            auth::require_placement_password,
        ));

    public
        .merge(placement)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
