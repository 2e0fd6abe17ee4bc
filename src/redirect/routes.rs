use axum::{routing::get, Router};
use std::sync::Arc;

use crate::analytics::GeoIpService;
use crate::storage::Storage;

use super::handlers::{redirect_to_target, RedirectState};

/// Routes for the public tracking entry point. No CORS layer here:
/// redirects carry no cross-origin headers.
pub fn create_redirect_router(
    storage: Arc<dyn Storage>,
    geoip: Arc<GeoIpService>,
    visitor_salt: String,
) -> Router {
    let state = Arc::new(RedirectState {
        storage,
        geoip,
        visitor_salt,
    });

    Router::new()
        .route("/t/{code}", get(redirect_to_target))
        .with_state(state)
}
