/// One resolved redirect event. Append-only: clicks are never updated or
/// deleted, and they remain attributable to links that have since been
/// deactivated.
#[derive(Debug, Clone)]
pub struct Click {
    pub link_id: String,
    /// First 8 bytes of SHA-256(ip + salt), lowercase hex. Not reversible
    /// to the IP address.
    pub visitor_hash: String,
    pub country: String,
    pub city: String,
    pub region: String,
    pub device_type: String,
    pub browser: String,
    pub os: String,
    pub user_agent: String,
    pub referer: String,
    /// Unix seconds, UTC, set at ingestion.
    pub clicked_at: i64,
}
