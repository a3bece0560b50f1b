//! Client IP extraction from proxy headers.
//!
//! The service runs behind Cloudflare (and previously Fly.io), so the
//! connection peer address is the proxy, not the client. Headers are checked
//! in trust order; values that do not parse as an IP address are skipped.

use std::net::IpAddr;

use axum::http::HeaderMap;

/// Sentinel recorded in the attempts log when no proxy header yields a
/// usable address.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Extract the client IP as text for the rate-limit attempts log.
///
/// Checks `CF-Connecting-IP`, then `X-Forwarded-For` (first hop), then
/// `X-Real-IP`, then `Fly-Client-IP`, and falls back to `"unknown"`.
#[must_use]
pub fn client_ip(headers: &HeaderMap) -> String {
    // Cloudflare's real client IP
    if let Some(ip) = header_ip(headers, "cf-connecting-ip") {
        return ip;
    }

    // First IP in the X-Forwarded-For chain
    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
    {
        return ip.to_string();
    }

    if let Some(ip) = header_ip(headers, "x-real-ip") {
        return ip;
    }

    if let Some(ip) = header_ip(headers, "fly-client-ip") {
        return ip;
    }

    UNKNOWN_CLIENT.to_string()
}

fn header_ip(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
        .map(|ip| ip.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_cloudflare_header_wins() {
        let map = headers(&[
            ("cf-connecting-ip", "203.0.113.9"),
            ("x-forwarded-for", "198.51.100.1"),
        ]);
        assert_eq!(client_ip(&map), "203.0.113.9");
    }

    #[test]
    fn test_forwarded_for_takes_first_hop() {
        let map = headers(&[("x-forwarded-for", "198.51.100.1, 10.0.0.1, 10.0.0.2")]);
        assert_eq!(client_ip(&map), "198.51.100.1");
    }

    #[test]
    fn test_real_ip_fallback() {
        let map = headers(&[("x-real-ip", " 192.0.2.44 ")]);
        assert_eq!(client_ip(&map), "192.0.2.44");
    }

    #[test]
    fn test_garbage_headers_fall_through() {
        let map = headers(&[
            ("cf-connecting-ip", "not-an-ip"),
            ("x-forwarded-for", "also-not-an-ip"),
        ]);
        assert_eq!(client_ip(&map), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_no_headers_is_unknown() {
        assert_eq!(client_ip(&HeaderMap::new()), UNKNOWN_CLIENT);
    }

    #[test]
    fn test_ipv6_accepted() {
        let map = headers(&[("cf-connecting-ip", "2001:db8::1")]);
        assert_eq!(client_ip(&map), "2001:db8::1");
    }
}
