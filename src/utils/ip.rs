//! Client IP extraction
//!
//! Best-effort: the first entry of a forwarded-for chain when one is
//! present, then `X-Real-IP`, then the peer address, then `"unknown"`.

use std::net::IpAddr;

use actix_web::HttpRequest;

/// Checks whether an IP is private, link-local or loopback; such
/// addresses never resolve through GeoIP.
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            // fc00::/7 (ULA), fe80::/10 (link-local), ::1 (loopback)
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

pub fn extract_client_ip(req: &HttpRequest) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').map(str::trim).find(|s| !s.is_empty()) {
            return first.to_string();
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP").and_then(|v| v.to_str().ok()) {
        let trimmed = real_ip.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    match req.peer_addr() {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_forwarded_for_first_entry_wins() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1, 10.0.0.2"))
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn test_real_ip_fallback() {
        let req = TestRequest::default()
            .insert_header(("X-Real-IP", "198.51.100.4"))
            .to_http_request();
        assert_eq!(extract_client_ip(&req), "198.51.100.4");
    }

    #[test]
    fn test_unknown_without_headers_or_peer() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(extract_client_ip(&req), "unknown");
    }

    #[test]
    fn test_private_and_local_detection() {
        assert!(is_private_or_local(&"127.0.0.1".parse().unwrap()));
        assert!(is_private_or_local(&"192.168.1.10".parse().unwrap()));
        assert!(is_private_or_local(&"fe80::1".parse().unwrap()));
        assert!(!is_private_or_local(&"203.0.113.7".parse().unwrap()));
    }
}
