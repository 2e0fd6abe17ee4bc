use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::analytics::models::{DayCount, DimensionCount, HourCount, RecentClick};
use crate::models::{Click, Link, LinkOverview, NewLink};
use crate::storage::{ClickDimension, Storage, StorageError, StorageResult};

pub struct SqliteStorage {
    pool: Arc<SqlitePool>,
}

impl SqliteStorage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS links (
                id TEXT PRIMARY KEY,
                short_code TEXT NOT NULL UNIQUE,
                original_url TEXT NOT NULL,
                title TEXT,
                created_at INTEGER NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clicks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                link_id TEXT NOT NULL REFERENCES links(id),
                ip_hash TEXT NOT NULL,
                country TEXT NOT NULL DEFAULT 'unknown',
                city TEXT NOT NULL DEFAULT 'unknown',
                region TEXT NOT NULL DEFAULT 'unknown',
                device_type TEXT NOT NULL,
                browser TEXT NOT NULL,
                os TEXT NOT NULL,
                user_agent TEXT NOT NULL,
                referer TEXT NOT NULL DEFAULT '',
                clicked_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_links_short_code ON links(short_code)")
            .execute(self.pool.as_ref())
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_clicks_link_clicked ON clicks(link_id, clicked_at)",
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn create_link(&self, link: &NewLink) -> StorageResult<Link> {
        let result = sqlx::query(
            r#"
            INSERT INTO links (id, short_code, original_url, title, created_at, is_active)
            VALUES (?, ?, ?, ?, ?, 1)
            ON CONFLICT(short_code) DO NOTHING
            "#,
        )
        .bind(&link.id)
        .bind(&link.short_code)
        .bind(&link.original_url)
        .bind(&link.title)
        .bind(link.created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| StorageError::Other(e.into()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }

        let created = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_code, original_url, title, created_at, is_active
            FROM links
            WHERE short_code = ?
            "#,
        )
        .bind(&link.short_code)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| StorageError::Other(e.into()))?;

        Ok(created)
    }

    async fn find_link(&self, id_or_code: &str) -> Result<Option<Link>> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_code, original_url, title, created_at, is_active
            FROM links
            WHERE id = ? OR short_code = ?
            "#,
        )
        .bind(id_or_code)
        .bind(id_or_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_active_by_code(&self, short_code: &str) -> Result<Option<Link>> {
        let link = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_code, original_url, title, created_at, is_active
            FROM links
            WHERE short_code = ? AND is_active = 1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn list_links(&self) -> Result<Vec<LinkOverview>> {
        let links = sqlx::query_as::<_, LinkOverview>(
            r#"
            SELECT l.id, l.short_code, l.original_url, l.title, l.created_at, l.is_active,
                   COUNT(c.id) AS total_clicks,
                   MAX(c.clicked_at) AS last_click
            FROM links l
            LEFT JOIN clicks c ON c.link_id = l.id
            WHERE l.is_active = 1
            GROUP BY l.id
            ORDER BY l.created_at DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn deactivate_link(&self, id_or_code: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE links
            SET is_active = 0
            WHERE id = ? OR short_code = ?
            "#,
        )
        .bind(id_or_code)
        .bind(id_or_code)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn append_click(&self, click: &Click) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO clicks (link_id, ip_hash, country, city, region,
                                device_type, browser, os, user_agent, referer, clicked_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&click.link_id)
        .bind(&click.visitor_hash)
        .bind(&click.country)
        .bind(&click.city)
        .bind(&click.region)
        .bind(&click.device_type)
        .bind(&click.browser)
        .bind(&click.os)
        .bind(&click.user_agent)
        .bind(&click.referer)
        .bind(click.clicked_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn count_clicks(&self, link_id: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM clicks WHERE link_id = ?",
        )
        .bind(link_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn count_unique_visitors(&self, link_id: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT ip_hash) FROM clicks WHERE link_id = ?",
        )
        .bind(link_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn scan_range(&self, link_id: &str) -> Result<(Option<i64>, Option<i64>)> {
        let range = sqlx::query_as::<_, (Option<i64>, Option<i64>)>(
            "SELECT MIN(clicked_at), MAX(clicked_at) FROM clicks WHERE link_id = ?",
        )
        .bind(link_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(range)
    }

    async fn clicks_on_date(&self, link_id: &str, date: NaiveDate) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM clicks
            WHERE link_id = ? AND DATE(clicked_at, 'unixepoch') = ?
            "#,
        )
        .bind(link_id)
        .bind(date.to_string())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn clicks_by_day(&self, link_id: &str, since: i64) -> Result<Vec<DayCount>> {
        let days = sqlx::query_as::<_, DayCount>(
            r#"
            SELECT DATE(clicked_at, 'unixepoch') AS date, COUNT(*) AS count
            FROM clicks
            WHERE link_id = ? AND clicked_at >= ?
            GROUP BY date
            ORDER BY date DESC
            "#,
        )
        .bind(link_id)
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(days)
    }

    async fn clicks_by_hour(&self, link_id: &str) -> Result<Vec<HourCount>> {
        let hours = sqlx::query_as::<_, HourCount>(
            r#"
            SELECT strftime('%H', clicked_at, 'unixepoch') AS hour, COUNT(*) AS count
            FROM clicks
            WHERE link_id = ?
            GROUP BY hour
            ORDER BY hour ASC
            "#,
        )
        .bind(link_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(hours)
    }

    async fn clicks_by_dimension(
        &self,
        link_id: &str,
        dimension: ClickDimension,
        limit: Option<i64>,
    ) -> Result<Vec<DimensionCount>> {
        let column = dimension.column();
        let mut sql = format!(
            "SELECT {column} AS label, COUNT(*) AS count FROM clicks WHERE link_id = ?"
        );
        if dimension == ClickDimension::City {
            sql.push_str(" AND city != 'unknown'");
        }
        sql.push_str(&format!(" GROUP BY {column} ORDER BY count DESC, label ASC"));
        if limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut query = sqlx::query_as::<_, DimensionCount>(&sql).bind(link_id);
        if let Some(limit) = limit {
            query = query.bind(limit);
        }

        Ok(query.fetch_all(self.pool.as_ref()).await?)
    }

    async fn recent_clicks(&self, link_id: &str, limit: i64) -> Result<Vec<RecentClick>> {
        let clicks = sqlx::query_as::<_, RecentClick>(
            r#"
            SELECT clicked_at, country, city, device_type, browser, os
            FROM clicks
            WHERE link_id = ?
            ORDER BY clicked_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(link_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(clicks)
    }
}
