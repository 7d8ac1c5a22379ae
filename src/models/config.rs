//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_fetch_limit() -> usize {
    5000
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Base URL of the RepayKaro backend API, e.g. `https://api.example.com/api/`.
    pub api_base_url: String,
    /// Upper bound of records pulled into the working set per load.
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Marks the `admin_token` cookie as `Secure`.
    #[serde(default)]
    pub secure_cookies: bool,
}
