//! On-demand stats aggregation over the click store.
//!
//! Every dashboard number is computed on read; nothing is cached. Reads go
//! through the storage aggregation queries only — no ad hoc scans.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::analytics::models::LinkStats;
use crate::storage::{ClickDimension, Storage};

/// Trailing window for the per-day series.
const DAY_WINDOW_DAYS: i64 = 30;
/// Country and city lists are capped; device/browser/OS cardinality is
/// inherently small and stays uncapped.
const TOP_PLACES_LIMIT: i64 = 10;
const RECENT_CLICKS_LIMIT: i64 = 20;

pub struct StatsAggregator {
    storage: Arc<dyn Storage>,
}

impl StatsAggregator {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Compute the full dashboard payload for one link. `now` anchors the
    /// calendar buckets (today/yesterday, 30-day window) and is a parameter
    /// so tests can pin the clock. An empty click set yields zeros and
    /// empty lists; link existence is the caller's concern.
    pub async fn compute(&self, link_id: &str, now: DateTime<Utc>) -> Result<LinkStats> {
        let today = now.date_naive();
        let yesterday = today - Duration::days(1);
        let window_start = (now - Duration::days(DAY_WINDOW_DAYS)).timestamp();

        let total_clicks = self.storage.count_clicks(link_id).await?;
        let unique_scans = self.storage.count_unique_visitors(link_id).await?;
        let (first_scan, last_scan) = self.storage.scan_range(link_id).await?;
        let today_scans = self.storage.clicks_on_date(link_id, today).await?;
        let yesterday_scans = self.storage.clicks_on_date(link_id, yesterday).await?;
        let clicks_by_day = self.storage.clicks_by_day(link_id, window_start).await?;
        let clicks_by_hour = self.storage.clicks_by_hour(link_id).await?;
        let clicks_by_country = self
            .storage
            .clicks_by_dimension(link_id, ClickDimension::Country, Some(TOP_PLACES_LIMIT))
            .await?;
        let clicks_by_city = self
            .storage
            .clicks_by_dimension(link_id, ClickDimension::City, Some(TOP_PLACES_LIMIT))
            .await?;
        let clicks_by_device = self
            .storage
            .clicks_by_dimension(link_id, ClickDimension::Device, None)
            .await?;
        let clicks_by_browser = self
            .storage
            .clicks_by_dimension(link_id, ClickDimension::Browser, None)
            .await?;
        let clicks_by_os = self
            .storage
            .clicks_by_dimension(link_id, ClickDimension::Os, None)
            .await?;
        let recent_clicks = self
            .storage
            .recent_clicks(link_id, RECENT_CLICKS_LIMIT)
            .await?;

        Ok(LinkStats {
            total_clicks,
            unique_scans,
            first_scan,
            last_scan,
            today_scans,
            yesterday_scans,
            clicks_by_day,
            clicks_by_hour,
            clicks_by_country,
            clicks_by_city,
            clicks_by_device,
            clicks_by_browser,
            clicks_by_os,
            recent_clicks,
        })
    }
}
