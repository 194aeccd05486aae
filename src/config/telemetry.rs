//! IoT telemetry platform configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// IoT telemetry platform configuration
///
/// All three of `org`, `api_key` and `api_token` must be present for the
/// platform to be considered bound. Leaving all of them out is allowed.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Organization id
    pub org: Option<String>,

    /// Application API key
    pub api_key: Option<String>,

    /// Application API token
    pub api_token: Option<String>,

    /// Override for the REST base URL (defaults to the organization host)
    pub base_url: Option<String>,

    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl TelemetryConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn present(value: &Option<String>) -> bool {
        value.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// Check if the platform credentials are complete
    pub fn is_configured(&self) -> bool {
        Self::present(&self.org) && Self::present(&self.api_key) && Self::present(&self.api_token)
    }

    /// REST base URL for the organization
    pub fn resolved_base_url(&self) -> Option<String> {
        if let Some(url) = self.base_url.as_ref().filter(|u| !u.is_empty()) {
            return Some(url.trim_end_matches('/').to_string());
        }
        self.org
            .as_ref()
            .filter(|o| !o.is_empty())
            .map(|org| format!("https://{org}.internetofthings.ibmcloud.com"))
    }

    /// Validate telemetry configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let given = [&self.org, &self.api_key, &self.api_token]
            .into_iter()
            .filter(|v| Self::present(v))
            .count();
        if given != 0 && given != 3 {
            return Err(ValidationError::PartialTelemetryCredentials);
        }
        if let Some(url) = self.base_url.as_ref().filter(|u| !u.is_empty()) {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidTelemetryUrl);
            }
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            org: None,
            api_key: None,
            api_token: None,
            base_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
