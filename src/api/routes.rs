use axum::{
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::analytics::StatsAggregator;
use crate::config::TrackingConfig;
use crate::storage::Storage;

use super::cors::{apply_cors, CorsPolicy};
use super::handlers::{
    create_link, delete_link, get_link, get_stats, health_check, list_links, not_found, AppState,
};

/// JSON API plus the health probe, all behind the CORS layer. The
/// redirect entry point lives in its own router without it.
pub fn create_api_router(storage: Arc<dyn Storage>, tracking: TrackingConfig) -> Router {
    let policy = CorsPolicy::new(tracking.allowed_origins.clone());
    let state = Arc::new(AppState {
        aggregator: StatsAggregator::new(Arc::clone(&storage)),
        storage,
        tracking,
    });

    Router::new()
        .route("/api/links", get(list_links).post(create_link))
        .route("/api/links/{key}", get(get_link).delete(delete_link))
        .route("/api/stats/{key}", get(get_stats))
        .route("/health", get(health_check))
        // Explicit fallback so `merge` keeps 404s behind the CORS layer.
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(policy, apply_cors))
        .with_state(state)
}
