use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::analytics::models::{DayCount, DimensionCount, HourCount, RecentClick};
use crate::models::{Click, Link, LinkOverview, NewLink};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("short code already exists")]
    Conflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Grouping key for click aggregation. Mapping the dimension to a column
/// name here keeps caller input out of the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDimension {
    Country,
    City,
    Device,
    Browser,
    Os,
}

impl ClickDimension {
    pub(crate) fn column(self) -> &'static str {
        match self {
            ClickDimension::Country => "country",
            ClickDimension::City => "city",
            ClickDimension::Device => "device_type",
            ClickDimension::Browser => "browser",
            ClickDimension::Os => "os",
        }
    }
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables and indexes).
    async fn init(&self) -> Result<()>;

    /// Persist a new link. Fails with `StorageError::Conflict` when the
    /// short code is already taken, so the caller can redraw.
    async fn create_link(&self, link: &NewLink) -> StorageResult<Link>;

    /// Look up a link by id or short code (one key, both columns checked).
    async fn find_link(&self, id_or_code: &str) -> Result<Option<Link>>;

    /// Look up an active link by short code (redirect path).
    async fn find_active_by_code(&self, short_code: &str) -> Result<Option<Link>>;

    /// All active links, newest first, annotated with click activity.
    async fn list_links(&self) -> Result<Vec<LinkOverview>>;

    /// Soft-delete a link. Idempotent; absent and already-inactive links
    /// are not errors.
    async fn deactivate_link(&self, id_or_code: &str) -> Result<()>;

    /// Append one click record. The only write path into the click store.
    async fn append_click(&self, click: &Click) -> Result<()>;

    // Aggregation reads, consumed exclusively by the StatsAggregator.

    async fn count_clicks(&self, link_id: &str) -> Result<i64>;

    /// COUNT(DISTINCT visitor hash).
    async fn count_unique_visitors(&self, link_id: &str) -> Result<i64>;

    /// (min, max) of clicked_at, both None when the link has no clicks.
    async fn scan_range(&self, link_id: &str) -> Result<(Option<i64>, Option<i64>)>;

    /// Clicks on one UTC calendar date.
    async fn clicks_on_date(&self, link_id: &str, date: NaiveDate) -> Result<i64>;

    /// Per-day counts for clicks at or after `since` (Unix seconds),
    /// most recent date first.
    async fn clicks_by_day(&self, link_id: &str, since: i64) -> Result<Vec<DayCount>>;

    /// Per-hour-of-day counts across all time, hour label ascending.
    /// Hours without clicks are omitted.
    async fn clicks_by_hour(&self, link_id: &str) -> Result<Vec<HourCount>>;

    /// Grouped counts, descending by count with the label as deterministic
    /// tie-break. The city dimension excludes the literal "unknown".
    async fn clicks_by_dimension(
        &self,
        link_id: &str,
        dimension: ClickDimension,
        limit: Option<i64>,
    ) -> Result<Vec<DimensionCount>>;

    /// Most recent raw clicks, reverse chronological.
    async fn recent_clicks(&self, link_id: &str, limit: i64) -> Result<Vec<RecentClick>>;
}
