//! Data models for analytics

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Geographic hints attached to a click. Every field defaults to
/// `"unknown"` when no GeoIP database is configured or the lookup misses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoHints {
    pub country: String,
    pub city: String,
    pub region: String,
}

impl Default for GeoHints {
    fn default() -> Self {
        Self {
            country: "unknown".to_string(),
            city: "unknown".to_string(),
            region: "unknown".to_string(),
        }
    }
}

/// Per-calendar-day click count, `date` formatted `YYYY-MM-DD` (UTC).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DayCount {
    pub date: String,
    pub count: i64,
}

/// Per-hour-of-day click count across all time, `hour` labelled "00".."23".
/// Hours with zero clicks are omitted; consumers treat them as zero.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HourCount {
    pub hour: String,
    pub count: i64,
}

/// Grouped count for one aggregation bucket (country, city, device,
/// browser or OS).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DimensionCount {
    pub label: String,
    pub count: i64,
}

/// Raw recent click as shown in the activity feed.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecentClick {
    pub clicked_at: i64,
    pub country: String,
    pub city: String,
    pub device_type: String,
    pub browser: String,
    pub os: String,
}

/// Full dashboard payload for one link, computed on read from the click
/// store. Absence of data means zeros and empty lists, never an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    pub total_clicks: i64,
    pub unique_scans: i64,
    pub first_scan: Option<i64>,
    pub last_scan: Option<i64>,
    pub today_scans: i64,
    pub yesterday_scans: i64,
    pub clicks_by_day: Vec<DayCount>,
    pub clicks_by_hour: Vec<HourCount>,
    pub clicks_by_country: Vec<DimensionCount>,
    pub clicks_by_city: Vec<DimensionCount>,
    pub clicks_by_device: Vec<DimensionCount>,
    pub clicks_by_browser: Vec<DimensionCount>,
    #[serde(rename = "clicksByOS")]
    pub clicks_by_os: Vec<DimensionCount>,
    pub recent_clicks: Vec<RecentClick>,
}
