//! Cross-origin policy for the JSON API.
//!
//! Every API response carries an allow-origin header: the request Origin
//! is reflected when it is on the allow-list or a local-development host,
//! otherwise the first configured origin (or `*`) is answered. Preflight
//! requests short-circuit with the same headers and an empty body.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: Vec<String>,
}

impl CorsPolicy {
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }

    /// Pick the allow-origin value for a request Origin.
    pub fn resolve(&self, origin: Option<&str>) -> String {
        match origin {
            Some(origin) if self.is_allowed(origin) => origin.to_string(),
            _ => self
                .allowed_origins
                .first()
                .cloned()
                .unwrap_or_else(|| "*".to_string()),
        }
    }

    fn is_allowed(&self, origin: &str) -> bool {
        is_local_host(origin) || self.allowed_origins.iter().any(|allowed| origin == allowed)
    }
}

/// Development-host check anchored to the origin's host component, so
/// lookalikes such as `https://localhost.attacker.example` do not pass.
fn is_local_host(origin: &str) -> bool {
    let Some(rest) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };
    let host = rest.split([':', '/']).next().unwrap_or("");
    host == "localhost" || host == "127.0.0.1"
}

pub async fn apply_cors(
    State(policy): State<CorsPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let allow_origin = policy.resolve(origin.as_deref());

    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&allow_origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CorsPolicy {
        CorsPolicy::new(vec![
            "https://app.example.com".to_string(),
            "https://other.example.com".to_string(),
        ])
    }

    #[test]
    fn reflects_allowed_origin() {
        assert_eq!(
            policy().resolve(Some("https://app.example.com")),
            "https://app.example.com"
        );
        assert_eq!(
            policy().resolve(Some("https://other.example.com")),
            "https://other.example.com"
        );
    }

    #[test]
    fn local_development_hosts_are_always_allowed() {
        assert_eq!(
            policy().resolve(Some("http://localhost:3000")),
            "http://localhost:3000"
        );
        assert_eq!(
            policy().resolve(Some("http://127.0.0.1:5173")),
            "http://127.0.0.1:5173"
        );
    }

    #[test]
    fn localhost_lookalike_host_is_not_reflected() {
        assert_eq!(
            policy().resolve(Some("https://localhost.attacker.example")),
            "https://app.example.com"
        );
        assert_eq!(
            policy().resolve(Some("https://127.0.0.1.attacker.example")),
            "https://app.example.com"
        );
    }

    #[test]
    fn unknown_origin_falls_back_to_first_configured() {
        assert_eq!(
            policy().resolve(Some("https://evil.example.net")),
            "https://app.example.com"
        );
        assert_eq!(policy().resolve(None), "https://app.example.com");
    }

    #[test]
    fn empty_allow_list_falls_back_to_wildcard() {
        let policy = CorsPolicy::new(vec![]);
        assert_eq!(policy.resolve(Some("https://anywhere.example")), "*");
    }
}
