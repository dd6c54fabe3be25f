//! Client Configuration
//!
//! Where the API lives and how long transient status markers stay visible.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for every request path, e.g. `https://host/api`
    pub api_base_url: String,
    pub email_sent_window_ms: u64,
    pub email_error_window_ms: u64,
    pub notes_saved_window_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "/api".to_string(),
            email_sent_window_ms: 3000,
            email_error_window_ms: 4000,
            notes_saved_window_ms: 2000,
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` (trailing slash dropped), other fields default.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            api_base_url: format!("{}/api", base_url.trim_end_matches('/')),
            ..Default::default()
        }
    }

    pub fn email_sent_window(&self) -> Duration {
        Duration::from_millis(self.email_sent_window_ms)
    }

    pub fn email_error_window(&self) -> Duration {
        Duration::from_millis(self.email_error_window_ms)
    }

    pub fn notes_saved_window(&self) -> Duration {
        Duration::from_millis(self.notes_saved_window_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"api_base_url":"http://localhost:8000/api"}"#).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000/api");
        assert_eq!(config.email_sent_window(), Duration::from_secs(3));
        assert_eq!(config.email_error_window(), Duration::from_secs(4));
    }

    #[test]
    fn test_with_base_url() {
        assert_eq!(ClientConfig::with_base_url("http://x/").api_base_url, "http://x/api");
        assert_eq!(ClientConfig::with_base_url("").api_base_url, "/api");
    }
}
