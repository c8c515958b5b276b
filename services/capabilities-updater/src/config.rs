//! HTTP fetch configuration.

use std::time::Duration;

/// Environment variable for the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "CAPABILITIES_TIMEOUT_SECS";

/// Environment variable for the connect timeout in seconds.
pub const CONNECT_TIMEOUT_ENV: &str = "CAPABILITIES_CONNECT_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Settings for GetCapabilities requests.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Whole-request timeout, including reading the body
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    /// Defaults overridden by `CAPABILITIES_TIMEOUT_SECS` and
    /// `CAPABILITIES_CONNECT_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secs = |name: &str, default: u64| {
            lookup(name)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };
        Self {
            timeout: Duration::from_secs(secs(TIMEOUT_ENV, DEFAULT_TIMEOUT_SECS)),
            connect_timeout: Duration::from_secs(secs(
                CONNECT_TIMEOUT_ENV,
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
