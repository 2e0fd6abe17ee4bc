//! Stats aggregation tests
//!
//! Feed a fixed click fixture into in-memory SQLite and verify every
//! dashboard figure the aggregator derives from it.

use chrono::{Duration, TimeZone, Utc};
use qrtrail::analytics::{visitor_hash, StatsAggregator};
use qrtrail::ids;
use qrtrail::models::{Click, Link, NewLink};
use qrtrail::storage::{SqliteStorage, Storage};
use std::sync::Arc;

const TEST_SALT: &str = "test-salt";

async fn create_test_storage() -> Arc<dyn Storage> {
    let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
    storage.init().await.unwrap();
    Arc::new(storage)
}

async fn seed_link(storage: &Arc<dyn Storage>) -> Link {
    storage
        .create_link(&NewLink {
            id: ids::new_link_id(),
            short_code: ids::new_short_code(ids::SHORT_CODE_LEN),
            original_url: "https://example.com".to_string(),
            title: Some("Example".to_string()),
            created_at: Utc::now().timestamp(),
        })
        .await
        .unwrap()
}

struct ClickFixture<'a> {
    ip: &'a str,
    country: &'a str,
    city: &'a str,
    device: &'a str,
    browser: &'a str,
    clicked_at: i64,
}

impl Default for ClickFixture<'_> {
    fn default() -> Self {
        Self {
            ip: "203.0.113.1",
            country: "US",
            city: "unknown",
            device: "mobile",
            browser: "Chrome",
            clicked_at: Utc::now().timestamp(),
        }
    }
}

async fn append(storage: &Arc<dyn Storage>, link_id: &str, fixture: ClickFixture<'_>) {
    storage
        .append_click(&Click {
            link_id: link_id.to_string(),
            visitor_hash: visitor_hash(fixture.ip, TEST_SALT),
            country: fixture.country.to_string(),
            city: fixture.city.to_string(),
            region: "unknown".to_string(),
            device_type: fixture.device.to_string(),
            browser: fixture.browser.to_string(),
            os: "Android".to_string(),
            user_agent: "test-agent".to_string(),
            referer: String::new(),
            clicked_at: fixture.clicked_at,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn totals_uniques_and_trend_buckets() {
    let storage = create_test_storage().await;
    let link = seed_link(&storage).await;
    let now = Utc::now();
    let yesterday = now - Duration::days(1);

    // 3 clicks, 2 distinct visitors: one today, two yesterday
    append(&storage, &link.id, ClickFixture {
        ip: "203.0.113.1",
        clicked_at: now.timestamp(),
        ..Default::default()
    })
    .await;
    append(&storage, &link.id, ClickFixture {
        ip: "203.0.113.1",
        clicked_at: yesterday.timestamp(),
        ..Default::default()
    })
    .await;
    append(&storage, &link.id, ClickFixture {
        ip: "203.0.113.2",
        clicked_at: yesterday.timestamp(),
        ..Default::default()
    })
    .await;

    let stats = StatsAggregator::new(Arc::clone(&storage))
        .compute(&link.id, now)
        .await
        .unwrap();

    assert_eq!(stats.total_clicks, 3);
    assert_eq!(stats.unique_scans, 2);
    assert_eq!(stats.today_scans, 1);
    assert_eq!(stats.yesterday_scans, 2);
    assert_eq!(stats.first_scan, Some(yesterday.timestamp()));
    assert_eq!(stats.last_scan, Some(now.timestamp()));
}

#[tokio::test]
async fn dimension_counts_sum_back_and_order_deterministically() {
    let storage = create_test_storage().await;
    let link = seed_link(&storage).await;

    // US x3, BR x2, CA x2, DE x1; mobile x6, desktop x2
    let countries = ["US", "US", "US", "BR", "BR", "CA", "CA", "DE"];
    for (i, country) in countries.iter().enumerate() {
        let device = if i < 6 { "mobile" } else { "desktop" };
        append(&storage, &link.id, ClickFixture {
            country,
            device,
            ..Default::default()
        })
        .await;
    }

    let stats = StatsAggregator::new(Arc::clone(&storage))
        .compute(&link.id, Utc::now())
        .await
        .unwrap();

    let total: i64 = stats.clicks_by_country.iter().map(|c| c.count).sum();
    assert_eq!(total, 8);

    let labels: Vec<&str> = stats
        .clicks_by_country
        .iter()
        .map(|c| c.label.as_str())
        .collect();
    // Descending count, label ascending breaks the BR/CA tie
    assert_eq!(labels, vec!["US", "BR", "CA", "DE"]);

    let device_total: i64 = stats.clicks_by_device.iter().map(|c| c.count).sum();
    assert_eq!(device_total, 8);
    assert_eq!(stats.clicks_by_device[0].label, "mobile");
    assert_eq!(stats.clicks_by_device[0].count, 6);
}

#[tokio::test]
async fn city_breakdown_excludes_unknown() {
    let storage = create_test_storage().await;
    let link = seed_link(&storage).await;

    append(&storage, &link.id, ClickFixture {
        city: "Lisbon",
        ..Default::default()
    })
    .await;
    append(&storage, &link.id, ClickFixture {
        city: "unknown",
        ..Default::default()
    })
    .await;

    let stats = StatsAggregator::new(Arc::clone(&storage))
        .compute(&link.id, Utc::now())
        .await
        .unwrap();

    assert_eq!(stats.clicks_by_city.len(), 1);
    assert_eq!(stats.clicks_by_city[0].label, "Lisbon");
    // The unknown-city click still counts toward the total
    assert_eq!(stats.total_clicks, 2);
}

#[tokio::test]
async fn hour_buckets_are_labelled_and_ascending() {
    let storage = create_test_storage().await;
    let link = seed_link(&storage).await;

    let nine = Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap();
    let fourteen = Utc.with_ymd_and_hms(2026, 1, 15, 14, 5, 0).unwrap();
    for ts in [nine, nine, fourteen] {
        append(&storage, &link.id, ClickFixture {
            clicked_at: ts.timestamp(),
            ..Default::default()
        })
        .await;
    }

    let stats = StatsAggregator::new(Arc::clone(&storage))
        .compute(&link.id, Utc::now())
        .await
        .unwrap();

    assert_eq!(stats.clicks_by_hour.len(), 2);
    assert_eq!(stats.clicks_by_hour[0].hour, "09");
    assert_eq!(stats.clicks_by_hour[0].count, 2);
    assert_eq!(stats.clicks_by_hour[1].hour, "14");
    assert_eq!(stats.clicks_by_hour[1].count, 1);
}

#[tokio::test]
async fn day_series_is_windowed_and_newest_first() {
    let storage = create_test_storage().await;
    let link = seed_link(&storage).await;
    let now = Utc::now();

    append(&storage, &link.id, ClickFixture {
        clicked_at: now.timestamp(),
        ..Default::default()
    })
    .await;
    append(&storage, &link.id, ClickFixture {
        clicked_at: (now - Duration::days(2)).timestamp(),
        ..Default::default()
    })
    .await;
    // Outside the trailing 30-day window
    append(&storage, &link.id, ClickFixture {
        clicked_at: (now - Duration::days(40)).timestamp(),
        ..Default::default()
    })
    .await;

    let stats = StatsAggregator::new(Arc::clone(&storage))
        .compute(&link.id, now)
        .await
        .unwrap();

    assert_eq!(stats.total_clicks, 3);
    assert_eq!(stats.clicks_by_day.len(), 2);
    assert_eq!(stats.clicks_by_day[0].date, now.date_naive().to_string());
    assert_eq!(
        stats.clicks_by_day[1].date,
        (now - Duration::days(2)).date_naive().to_string()
    );
}

#[tokio::test]
async fn recent_clicks_cap_at_twenty_newest_first() {
    let storage = create_test_storage().await;
    let link = seed_link(&storage).await;
    let base = Utc::now().timestamp() - 100;

    for i in 0..25 {
        append(&storage, &link.id, ClickFixture {
            clicked_at: base + i,
            ..Default::default()
        })
        .await;
    }

    let stats = StatsAggregator::new(Arc::clone(&storage))
        .compute(&link.id, Utc::now())
        .await
        .unwrap();

    assert_eq!(stats.recent_clicks.len(), 20);
    assert_eq!(stats.recent_clicks[0].clicked_at, base + 24);
    assert_eq!(stats.recent_clicks[19].clicked_at, base + 5);
}

#[tokio::test]
async fn deactivated_link_keeps_its_history() {
    let storage = create_test_storage().await;
    let link = seed_link(&storage).await;

    append(&storage, &link.id, ClickFixture::default()).await;
    storage.deactivate_link(&link.id).await.unwrap();

    let stats = StatsAggregator::new(Arc::clone(&storage))
        .compute(&link.id, Utc::now())
        .await
        .unwrap();

    assert_eq!(stats.total_clicks, 1);
}

#[tokio::test]
async fn empty_click_set_yields_zeroes_not_errors() {
    let storage = create_test_storage().await;
    let link = seed_link(&storage).await;

    let stats = StatsAggregator::new(Arc::clone(&storage))
        .compute(&link.id, Utc::now())
        .await
        .unwrap();

    assert_eq!(stats.total_clicks, 0);
    assert_eq!(stats.unique_scans, 0);
    assert_eq!(stats.first_scan, None);
    assert_eq!(stats.last_scan, None);
    assert_eq!(stats.today_scans, 0);
    assert!(stats.clicks_by_day.is_empty());
    assert!(stats.clicks_by_hour.is_empty());
    assert!(stats.clicks_by_country.is_empty());
    assert!(stats.recent_clicks.is_empty());
}
