use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A trackable link as persisted in the `links` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub short_code: String,
    pub original_url: String,
    pub title: Option<String>,
    /// Unix seconds, UTC.
    pub created_at: i64,
    pub is_active: bool,
}

/// Insert payload for a new link; identifiers are generated by the caller
/// so a short-code conflict can be retried with a fresh draw.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub id: String,
    pub short_code: String,
    pub original_url: String,
    pub title: Option<String>,
    pub created_at: i64,
}

/// A link annotated with click activity, as returned by the list query.
/// `total_clicks` and `last_click` come from a LEFT JOIN aggregation over
/// the clicks table; they are never stored redundantly.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LinkOverview {
    pub id: String,
    pub short_code: String,
    pub original_url: String,
    pub title: Option<String>,
    pub created_at: i64,
    pub is_active: bool,
    pub total_clicks: i64,
    pub last_click: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub url: Option<String>,
    pub title: Option<String>,
}

/// Wire shape for a single link: the stored columns plus the derived
/// tracking URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    #[serde(flatten)]
    pub link: Link,
    pub tracking_url: String,
}

impl LinkResponse {
    pub fn new(link: Link, base_url: &str) -> Self {
        let tracking_url = tracking_url(base_url, &link.short_code);
        Self { link, tracking_url }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkOverviewResponse {
    #[serde(flatten)]
    pub link: LinkOverview,
    pub tracking_url: String,
}

impl LinkOverviewResponse {
    pub fn new(link: LinkOverview, base_url: &str) -> Self {
        let tracking_url = tracking_url(base_url, &link.short_code);
        Self { link, tracking_url }
    }
}

fn tracking_url(base_url: &str, short_code: &str) -> String {
    format!("{}/t/{}", base_url.trim_end_matches('/'), short_code)
}
