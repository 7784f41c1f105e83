//! Shared HTTP client configuration for providers.

use crate::error::TransportError;

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("tripwire/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// User agent string.
    pub user_agent: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Some(60),
            user_agent: None,
        }
    }
}

impl HttpClientConfig {
    /// Build a reqwest client with this configuration.
    ///
    /// # Errors
    ///
    /// Returns a provider error if the TLS backend or resolver cannot be
    /// initialized.
    pub fn build_client(&self) -> Result<reqwest::Client, TransportError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT));

        if let Some(timeout) = self.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(timeout));
        }

        builder
            .build()
            .map_err(|e| TransportError::provider("http", format!("Failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_config_default() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout_secs, Some(60));
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_build_client() {
        let config = HttpClientConfig {
            timeout_secs: None,
            user_agent: Some("guard/1.0".into()),
        };
        assert!(config.build_client().is_ok());
    }
}
