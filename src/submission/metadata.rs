use std::net::IpAddr;

use axum::http::HeaderMap;
use chrono::{DateTime, Local};
use ipnet::IpNet;

/// Per-request facts that are not part of the form itself.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub received_at: DateTime<Local>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestContext {
    /// `YYYY-MM-DD HH:MM:SS` in server local time.
    pub fn timestamp(&self) -> String {
        self.received_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn ip_or_unknown(&self) -> &str {
        self.ip.as_deref().unwrap_or("Unknown")
    }

    pub fn user_agent_or_unknown(&self) -> &str {
        self.user_agent.as_deref().unwrap_or("Unknown")
    }
}

/// Extract submission metadata from request headers.
pub fn extract(
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    trusted_proxies: &[IpNet],
) -> RequestContext {
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    RequestContext {
        received_at: Local::now(),
        ip: extract_ip(headers, peer_addr, trusted_proxies),
        user_agent,
    }
}

fn extract_ip(
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    trusted_proxies: &[IpNet],
) -> Option<String> {
    let peer = peer_addr?;

    // Only trust X-Forwarded-For if the direct connection is from a trusted proxy
    if trusted_proxies.iter().any(|net| net.contains(&peer)) {
        if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
            // Take the first (leftmost) IP that isn't a trusted proxy
            for ip_str in xff.split(',').map(|s| s.trim()) {
                if let Ok(ip) = ip_str.parse::<IpAddr>() {
                    if !trusted_proxies.iter().any(|net| net.contains(&ip)) {
                        return Some(ip.to_string());
                    }
                }
            }
        }
    }

    Some(peer.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, v.parse().unwrap());
        }
        map
    }

    #[test]
    fn forwarded_for_ignored_from_untrusted_peer() {
        let h = headers(&[("x-forwarded-for", "203.0.113.9")]);
        let ctx = extract(&h, Some("198.51.100.2".parse().unwrap()), &[]);
        assert_eq!(ctx.ip.as_deref(), Some("198.51.100.2"));
    }

    #[test]
    fn forwarded_for_used_behind_trusted_proxy() {
        let h = headers(&[("x-forwarded-for", "203.0.113.9, 10.0.0.5")]);
        let proxies: Vec<IpNet> = vec!["10.0.0.0/8".parse().unwrap()];
        let ctx = extract(&h, Some("10.0.0.1".parse().unwrap()), &proxies);
        assert_eq!(ctx.ip.as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn missing_values_render_unknown() {
        let ctx = extract(&HeaderMap::new(), None, &[]);
        assert_eq!(ctx.ip_or_unknown(), "Unknown");
        assert_eq!(ctx.user_agent_or_unknown(), "Unknown");
    }
}
