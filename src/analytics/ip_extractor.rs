//! Client IP extraction from HTTP headers.
//!
//! Deployments behind Cloudflare get `CF-Connecting-IP` trusted first,
//! then the rightmost `X-Forwarded-For` entry, falling back to the socket
//! remote address.

use axum::http::HeaderMap;
use std::net::IpAddr;

pub fn extract_client_ip(headers: &HeaderMap, socket_addr: IpAddr) -> IpAddr {
    if let Some(ip) = extract_cloudflare_ip(headers) {
        return ip;
    }

    if let Some(ip) = extract_from_x_forwarded_for(headers) {
        return ip;
    }

    socket_addr
}

fn extract_cloudflare_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("cf-connecting-ip")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<IpAddr>().ok())
}

fn extract_from_x_forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    let xff = headers.get("x-forwarded-for")?.to_str().ok()?;

    xff.split(',')
        .filter_map(|s| s.trim().parse::<IpAddr>().ok())
        .next_back()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SOCKET: &str = "192.168.1.1";

    #[test]
    fn falls_back_to_socket_address() {
        let headers = HeaderMap::new();
        let socket: IpAddr = SOCKET.parse().unwrap();
        assert_eq!(extract_client_ip(&headers, socket), socket);
    }

    #[test]
    fn prefers_cloudflare_header() {
        let mut headers = HeaderMap::new();
        headers.insert("cf-connecting-ip", HeaderValue::from_static("203.0.113.1"));
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("198.51.100.1"),
        );
        let result = extract_client_ip(&headers, SOCKET.parse().unwrap());
        assert_eq!(result, "203.0.113.1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn takes_rightmost_forwarded_for_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.1, 198.51.100.1"),
        );
        let result = extract_client_ip(&headers, SOCKET.parse().unwrap());
        assert_eq!(result, "198.51.100.1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn ignores_unparseable_header_values() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));
        let socket: IpAddr = SOCKET.parse().unwrap();
        assert_eq!(extract_client_ip(&headers, socket), socket);
    }
}
