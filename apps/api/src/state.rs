use std::sync::Arc;

use crate::config::Config;
use crate::screening::pipeline::ScreeningPipeline;
use crate::store::ApplicationStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `PgStore` when `DATABASE_URL` is set, `MemoryStore` otherwise.
    pub store: Arc<dyn ApplicationStore>,
    pub pipeline: ScreeningPipeline,
    pub config: Config,
}
