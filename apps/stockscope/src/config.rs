use std::env;
use std::time::Duration;
use stockscope_api::{ClientConfig, DEFAULT_BASE_URL};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings read from the environment (and `.env`), before command line
/// overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub timeout_secs: u64,
}

fn env_str(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    lookup(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u64(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> u64 {
    lookup(name)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_url: env_str(&lookup, "STOCKSCOPE_API_URL", DEFAULT_BASE_URL),
            timeout_secs: env_u64(&lookup, "STOCKSCOPE_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(api_url) = api_url.filter(|url| !url.trim().is_empty()) {
            self.api_url = api_url;
        }
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::builder()
            .base_url(self.api_url.as_str())
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
    }
}
