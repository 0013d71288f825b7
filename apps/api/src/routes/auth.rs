use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

pub const PLACEMENT_PASSWORD_HEADER: &str = "x-placement-password";

/// Guards placement-team routes with the shared password.
pub async fn require_placement_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let supplied = headers
        .get(PLACEMENT_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok());

    match supplied {
        Some(password) if password == state.config.placement_password => {
            Ok(next.run(request).await)
        }
        _ => {
            warn!(path = %request.uri().path(), "Placement password missing or wrong");
            Err(AppError::Unauthorized)
        }
    }
}
