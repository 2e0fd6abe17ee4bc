//! Visitor fingerprinting: pseudonymous visitor identity and user-agent
//! classification.

use sha2::{Digest, Sha256};

/// Classified user-agent signals stored alongside each click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentInfo {
    pub device_type: String,
    pub browser: String,
    pub os: String,
}

/// Derive the pseudonymous visitor identifier: lowercase hex of the first
/// 8 bytes of SHA-256(ip + salt). One-way; the IP cannot be recovered.
pub fn visitor_hash(ip: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    hasher.update(salt.as_bytes());
    let digest = hasher.finalize();
    digest[..8].iter().map(|b| format!("{b:02x}")).collect()
}

const MOBILE_MARKERS: &[&str] = &[
    "mobile",
    "android",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "windows phone",
];

const TABLET_MARKERS: &[&str] = &["ipad", "tablet"];

/// Ordered browser token table. Chrome-based user agents also contain
/// "Safari", so more specific tokens must win; first match takes it.
const BROWSER_TOKENS: &[(&str, &str)] = &[
    ("Firefox", "Firefox"),
    ("SamsungBrowser", "Samsung Browser"),
    ("Opera", "Opera"),
    ("OPR", "Opera"),
    ("Edge", "Edge"),
    ("Chrome", "Chrome"),
    ("Safari", "Safari"),
];

const OS_TOKENS: &[(&str, &str)] = &[
    ("Windows", "Windows"),
    ("Mac", "macOS"),
    ("Linux", "Linux"),
    ("Android", "Android"),
    ("iPhone", "iOS"),
    ("iPad", "iOS"),
];

/// Classify a raw user-agent string. An empty string yields `unknown`
/// across the board rather than failing.
pub fn classify(user_agent: &str) -> UserAgentInfo {
    if user_agent.is_empty() {
        return UserAgentInfo {
            device_type: "unknown".to_string(),
            browser: "unknown".to_string(),
            os: "unknown".to_string(),
        };
    }

    UserAgentInfo {
        device_type: device_type(user_agent).to_string(),
        browser: match_token(user_agent, BROWSER_TOKENS).to_string(),
        os: match_token(user_agent, OS_TOKENS).to_string(),
    }
}

fn device_type(user_agent: &str) -> &'static str {
    let ua = user_agent.to_lowercase();
    if MOBILE_MARKERS.iter().any(|marker| ua.contains(marker)) {
        // Tablet markers take precedence over generic mobile ones.
        if TABLET_MARKERS.iter().any(|marker| ua.contains(marker)) {
            "tablet"
        } else {
            "mobile"
        }
    } else {
        "desktop"
    }
}

fn match_token(user_agent: &str, tokens: &[(&str, &'static str)]) -> &'static str {
    tokens
        .iter()
        .find(|(token, _)| user_agent.contains(token))
        .map(|(_, name)| *name)
        .unwrap_or("other")
}
