//! REST Telemetry Service - Implementation of TelemetryService for the IoT
//! platform v0002 API.
//!
//! # Endpoints
//!
//! - `GET {base}/api/v0002/bulk/devices` - registry listing
//! - `GET {base}/api/v0002/device/types/{type}/devices/{id}/events` - last-event cache
//!
//! Requests authenticate with the application API key and token as HTTP
//! basic credentials.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::config::TelemetryConfig;
use crate::domain::{DeviceRegistryEntry, TelemetrySample};
use crate::ports::{TelemetryError, TelemetryService};

/// Configuration for the REST telemetry service.
#[derive(Debug, Clone)]
pub struct RestTelemetryConfig {
    /// Base URL (e.g. https://abc123.internetofthings.ibmcloud.com).
    pub base_url: String,
    /// Application API key.
    pub api_key: String,
    /// Application API token.
    api_token: Secret<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl RestTelemetryConfig {
    /// Creates a new configuration.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            api_token: Secret::new(api_token.into()),
            timeout: Duration::from_secs(30),
        }
    }

    /// Builds the adapter configuration when the platform is bound.
    pub fn from_config(config: &TelemetryConfig) -> Option<Self> {
        if !config.is_configured() {
            return None;
        }
        let base_url = config.resolved_base_url()?;
        Some(
            Self::new(
                base_url,
                config.api_key.clone().unwrap_or_default(),
                config.api_token.clone().unwrap_or_default(),
            )
            .with_timeout(config.timeout()),
        )
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_token(&self) -> &str {
        self.api_token.expose_secret()
    }
}

/// IoT platform v0002 REST API client.
pub struct RestTelemetryService {
    config: RestTelemetryConfig,
    client: Client,
}

impl RestTelemetryService {
    /// Creates a new telemetry client with the given configuration.
    pub fn new(config: RestTelemetryConfig) -> Result<Self, TelemetryError> {
        Url::parse(&config.base_url)
            .map_err(|e| TelemetryError::network(format!("Invalid telemetry URL: {}", e)))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TelemetryError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds `{base}/api/v0002/{segments...}` with each segment escaped.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, TelemetryError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| TelemetryError::network(format!("Invalid telemetry URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| TelemetryError::network("Telemetry URL cannot be a base"))?
            .pop_if_empty()
            .extend(["api", "v0002"])
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Response, TelemetryError> {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.config.api_key, Some(self.config.api_token()))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TelemetryError::network(format!(
                        "Timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else if e.is_connect() {
                    TelemetryError::network(format!("Connection failed: {}", e))
                } else {
                    TelemetryError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(TelemetryError::AuthenticationFailed),
            code => Err(TelemetryError::rejected(code, error_body.trim())),
        }
    }
}

#[async_trait]
impl TelemetryService for RestTelemetryService {
    async fn list_devices(&self) -> Result<Vec<DeviceRegistryEntry>, TelemetryError> {
        let url = self.endpoint(&["bulk", "devices"])?;
        let listing: DeviceListing = self
            .get(url)
            .await?
            .json()
            .await
            .map_err(|e| TelemetryError::parse(format!("Failed to parse device list: {}", e)))?;

        tracing::debug!(devices = listing.results.len(), "Fetched device registry");
        Ok(listing.results)
    }

    async fn last_events(
        &self,
        type_id: &str,
        device_id: &str,
    ) -> Result<Vec<TelemetrySample>, TelemetryError> {
        let url = self.endpoint(&["device", "types", type_id, "devices", device_id, "events"])?;
        let samples: Vec<TelemetrySample> = self
            .get(url)
            .await?
            .json()
            .await
            .map_err(|e| TelemetryError::parse(format!("Failed to parse events: {}", e)))?;

        tracing::debug!(type_id, device_id, events = samples.len(), "Fetched last events");
        Ok(samples)
    }
}

// ----- IoT platform API Types -----

#[derive(Debug, Deserialize)]
struct DeviceListing {
    #[serde(default)]
    results: Vec<DeviceRegistryEntry>,
}
