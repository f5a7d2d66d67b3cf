//! Remote analyzer configuration and base URL resolution.

use std::time::Duration;

use tracing::warn;
use url::{Host, Url};

use crate::config::ServerConfig;
use crate::core::analyzer::base::{AnalyzerError, AnalyzerResult};

/// Port used when neither the configuration nor the host URL names one.
pub const DEFAULT_BACKEND_PORT: u16 = 5000;

/// Analysis endpoint on the remote service.
pub const ANALYZE_PATH: &str = "/api/analyze";

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => ip.is_loopback() || ip.is_unspecified(),
        Some(Host::Ipv6(ip)) => ip.is_loopback() || ip.is_unspecified(),
        None => false,
    }
}

/// Resolve the remote analyzer's base URL.
///
/// `host` may be a bare host name or a full URL; `http://` is assumed when no
/// scheme is given. An explicit port always wins. Otherwise the port in
/// `host` is used, or [`DEFAULT_BACKEND_PORT`]. When that implicit port equals
/// `listen_port` the gateway would call itself, so the default port is used
/// instead. An explicit port equal to `listen_port` on a loopback host is an
/// error.
pub fn resolve_backend_base_url(
    host: &str,
    explicit_port: Option<u16>,
    listen_port: u16,
) -> Result<Url, String> {
    let host = host.trim();
    let host = if host.is_empty() { "localhost" } else { host };

    let has_scheme = host
        .get(..8)
        .is_some_and(|p| p.eq_ignore_ascii_case("https://"))
        || host
            .get(..7)
            .is_some_and(|p| p.eq_ignore_ascii_case("http://"));
    let raw = if has_scheme {
        host.to_string()
    } else {
        format!("http://{host}")
    };

    let mut url =
        Url::parse(&raw).map_err(|e| format!("invalid analyzer host '{host}': {e}"))?;
    if url.host().is_none() {
        return Err(format!("analyzer host '{host}' has no host name"));
    }

    let port = match explicit_port {
        Some(port) => {
            if port == listen_port && is_loopback(&url) {
                return Err(format!(
                    "analyzer port {port} on a loopback host points at the gateway itself"
                ));
            }
            port
        }
        None => {
            let implicit = url.port().unwrap_or(DEFAULT_BACKEND_PORT);
            if implicit == listen_port {
                warn!(
                    port = implicit,
                    fallback = DEFAULT_BACKEND_PORT,
                    "Analyzer port matches the gateway port, using default backend port"
                );
                DEFAULT_BACKEND_PORT
            } else {
                implicit
            }
        }
    };

    url.set_port(Some(port))
        .map_err(|_| format!("analyzer host '{host}' cannot carry a port"))?;
    url.set_path("");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Settings for the remote analyzer client.
#[derive(Clone)]
pub struct RemoteAnalyzerConfig {
    pub base_url: Url,
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for RemoteAnalyzerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteAnalyzerConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RemoteAnalyzerConfig {
    pub fn from_server_config(config: &ServerConfig) -> AnalyzerResult<Self> {
        let base_url =
            resolve_backend_base_url(&config.analyzer_host, config.analyzer_port, config.port)
                .map_err(AnalyzerError::Configuration)?;

        Ok(Self {
            base_url,
            api_token: config
                .analyzer_api_token
                .as_ref()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            timeout: Duration::from_secs(config.analyzer_timeout_seconds),
        })
    }

    /// Full URL of the analysis endpoint.
    pub fn analyze_url(&self) -> AnalyzerResult<Url> {
        self.base_url
            .join(ANALYZE_PATH)
            .map_err(|e| AnalyzerError::Configuration(format!("invalid analyzer URL: {e}")))
    }
}
