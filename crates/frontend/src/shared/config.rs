//! Application configuration.
//!
//! A wasm bundle has no process environment at runtime, so the API base URL is
//! baked in at compile time from `API_URL`.

use chrono::Duration;

/// Base URL used when `API_URL` is not set at build time.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub login_path: String,
    pub not_authorized_path: String,
    /// How long a toast stays on screen.
    pub toast_ttl_ms: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::with_api_url(option_env!("API_URL"))
    }

    pub fn with_api_url(api_url: Option<&str>) -> Self {
        let api_base_url = api_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        Self {
            api_base_url,
            ..Self::default()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            login_path: "/login".to_string(),
            not_authorized_path: "/not-authorized".to_string(),
            toast_ttl_ms: 4_000,
        }
    }
}

/// Defaults applied to every query issued through the query layer. Queries
/// never refetch on window focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryConfig {
    /// Silent retries after the first failed attempt.
    pub retry: u32,
    pub stale_time: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            retry: 1,
            stale_time: Duration::minutes(5),
        }
    }
}
