//! Visitor analytics: fingerprinting, geolocation and stats aggregation.
//!
//! Everything here stays off the redirect hot path — fingerprinting and
//! GeoIP lookups run inside the background click-recording task, and the
//! aggregator only executes when a dashboard asks for stats.

pub mod aggregator;
pub mod fingerprint;
pub mod geoip;
pub mod ip_extractor;
pub mod models;

pub use aggregator::StatsAggregator;
pub use fingerprint::{classify, visitor_hash, UserAgentInfo};
pub use geoip::GeoIpService;
pub use ip_extractor::extract_client_ip;
pub use models::{DayCount, DimensionCount, GeoHints, HourCount, LinkStats, RecentClick};
