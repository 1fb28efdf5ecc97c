//! HTTP Client Factory
//!
//! Builds reqwest clients with proxy support, and parses proxy URLs given on
//! the command line or in config.

use std::time::Duration;

use interview_coach_core::proxy::{ProxyConfig, ProxyProtocol};
use url::Url;

use crate::types::{LlmError, LlmResult};

/// Connect timeout for the completion service. Request duration itself is not
/// bounded here.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Build a `reqwest::Client` with the resolved proxy configuration.
///
/// - `Some(proxy)` -> configure proxy on the client
/// - `None` -> explicitly disable proxy (`no_proxy`), ignoring env vars
pub fn build_http_client(proxy: Option<&ProxyConfig>) -> LlmResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().connect_timeout(CONNECT_TIMEOUT);
    match proxy {
        Some(cfg) => {
            let url = cfg.url();
            let mut p = reqwest::Proxy::all(&url).map_err(|e| LlmError::Configuration {
                message: format!("invalid proxy URL {}: {}", url, e),
            })?;
            if let (Some(u), Some(pw)) = (&cfg.username, &cfg.password) {
                p = p.basic_auth(u, pw);
            }
            builder = builder.proxy(p);
        }
        None => {
            builder = builder.no_proxy();
        }
    }
    builder.build().map_err(|e| LlmError::Configuration {
        message: format!("failed to build HTTP client: {}", e),
    })
}

/// Parse `scheme://[user[:pass]@]host:port` into a [`ProxyConfig`].
pub fn parse_proxy_url(raw: &str) -> LlmResult<ProxyConfig> {
    let invalid = |reason: &str| LlmError::Configuration {
        message: format!("invalid proxy URL '{}': {}", raw, reason),
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    let protocol =
        ProxyProtocol::from_scheme(url.scheme()).ok_or_else(|| invalid("unsupported scheme"))?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| invalid("missing host"))?
        .to_string();
    let port = url
        .port_or_known_default()
        .or(match protocol {
            ProxyProtocol::Socks5 => Some(1080),
            _ => None,
        })
        .ok_or_else(|| invalid("missing port"))?;

    let username = Some(url.username())
        .filter(|u| !u.is_empty())
        .map(str::to_string);
    let password = url.password().map(str::to_string);

    Ok(ProxyConfig {
        protocol,
        host,
        port,
        username,
        password,
    })
}
