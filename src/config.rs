//! Runtime configuration, loaded from environment variables.

use std::net::SocketAddr;
use std::time::Duration;

/// Public quiz feed used when no upstream is configured
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.jsonserve.com/Uw5CrX";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
    /// Remote feed relayed by the passthrough
    pub upstream_url: String,
    /// Endpoint the feed fetcher loads questions from
    pub feed_url: String,
    /// Timeout for every outbound request
    pub fetch_timeout: Duration,
    /// Directory served as the router fallback
    pub static_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let bind_addr: SocketAddr = DEFAULT_BIND_ADDR
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 3000)));
        Self {
            feed_url: local_passthrough_url(&bind_addr),
            bind_addr,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            fetch_timeout: Duration::from_secs(10),
            static_dir: "static".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let bind_addr = non_empty_var("QUIZ_BIND_ADDR")
            .and_then(|addr| match addr.parse::<SocketAddr>() {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::warn!("Ignoring invalid QUIZ_BIND_ADDR {:?}: {}", addr, e);
                    None
                }
            })
            .unwrap_or_else(|| AppConfig::default().bind_addr);

        let upstream_url =
            non_empty_var("QUIZ_UPSTREAM_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());

        let feed_url =
            non_empty_var("QUIZ_FEED_URL").unwrap_or_else(|| local_passthrough_url(&bind_addr));

        let fetch_timeout = non_empty_var("QUIZ_FETCH_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        let static_dir = non_empty_var("QUIZ_STATIC_DIR").unwrap_or_else(|| "static".to_string());

        Self {
            bind_addr,
            upstream_url,
            feed_url,
            fetch_timeout,
            static_dir,
        }
    }
}

/// Same-origin passthrough URL for a server bound to `addr`
pub fn local_passthrough_url(addr: &SocketAddr) -> String {
    let host = if addr.ip().is_unspecified() {
        "127.0.0.1".to_string()
    } else {
        addr.ip().to_string()
    };
    let host = if addr.is_ipv6() && !addr.ip().is_unspecified() {
        format!("[{}]", host)
    } else {
        host
    };
    format!("http://{}:{}/api/proxy", host, addr.port())
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
