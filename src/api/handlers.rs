use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::analytics::{LinkStats, StatsAggregator};
use crate::config::TrackingConfig;
use crate::errors::ServiceError;
use crate::ids;
use crate::models::{
    CreateLinkRequest, LinkOverviewResponse, LinkResponse, NewLink,
};
use crate::storage::{Storage, StorageError};

/// Upper bound on redraws after short-code collisions. At the default code
/// length a collision is already vanishingly rare.
const MAX_CODE_ATTEMPTS: u32 = 5;

pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub aggregator: StatsAggregator,
    pub tracking: TrackingConfig,
}

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Serialize)]
pub struct StatsPayload {
    pub link: LinkResponse,
    pub stats: LinkStats,
}

/// Create a new trackable link.
pub async fn create_link(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<ApiResponse<LinkResponse>>), ServiceError> {
    let url = payload.url.unwrap_or_default();
    if url.trim().is_empty() {
        return Err(ServiceError::Validation("url is required".to_string()));
    }
    let title = payload.title.filter(|title| !title.is_empty());

    let mut attempts = 0;
    let link = loop {
        let new_link = NewLink {
            id: ids::new_link_id(),
            short_code: ids::new_short_code(ids::SHORT_CODE_LEN),
            original_url: url.clone(),
            title: title.clone(),
            created_at: Utc::now().timestamp(),
        };

        match state.storage.create_link(&new_link).await {
            Ok(link) => break link,
            Err(StorageError::Conflict) => {
                attempts += 1;
                if attempts >= MAX_CODE_ATTEMPTS {
                    return Err(ServiceError::Storage(anyhow::anyhow!(
                        "could not allocate a unique short code after {attempts} attempts"
                    )));
                }
                tracing::debug!(attempts, "short code collision, redrawing");
            }
            Err(StorageError::Other(err)) => return Err(ServiceError::Storage(err)),
        }
    };

    tracing::info!(link_id = %link.id, short_code = %link.short_code, "created link");

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(LinkResponse::new(link, &state.tracking.public_base_url)),
    ))
}

/// List active links with their click activity.
pub async fn list_links(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<LinkOverviewResponse>>>, ServiceError> {
    let links = state.storage.list_links().await?;
    let base_url = &state.tracking.public_base_url;

    Ok(ApiResponse::ok(
        links
            .into_iter()
            .map(|link| LinkOverviewResponse::new(link, base_url))
            .collect(),
    ))
}

/// Retrieve one link by id or short code.
pub async fn get_link(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<LinkResponse>>, ServiceError> {
    let link = state
        .storage
        .find_link(&key)
        .await?
        .ok_or_else(|| ServiceError::NotFound("link not found".to_string()))?;

    Ok(ApiResponse::ok(LinkResponse::new(
        link,
        &state.tracking.public_base_url,
    )))
}

/// Deactivate a link. Fire-and-forget: already-inactive and unknown keys
/// answer 200 as well.
pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    state.storage.deactivate_link(&key).await?;
    Ok(Json(json!({ "success": true })))
}

/// Dashboard stats for one link.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<StatsPayload>>, ServiceError> {
    let link = state
        .storage
        .find_link(&key)
        .await?
        .ok_or_else(|| ServiceError::NotFound("link not found".to_string()))?;

    let stats = state.aggregator.compute(&link.id, Utc::now()).await?;

    Ok(ApiResponse::ok(StatsPayload {
        link: LinkResponse::new(link, &state.tracking.public_base_url),
        stats,
    }))
}

/// Catch-all for unmatched paths. Lives inside this router so even 404
/// responses carry the cross-origin headers.
pub async fn not_found() -> ServiceError {
    ServiceError::NotFound("not found".to_string())
}

/// Liveness probe. No side effects.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
