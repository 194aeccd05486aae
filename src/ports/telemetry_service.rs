//! Telemetry Service Port - Interface for the IoT platform.
//!
//! Two read-only operations: the device registry listing and the last-event
//! cache for one device. Callers treat every error as a degraded answer, never
//! as a failed request.

use async_trait::async_trait;

use crate::domain::{DeviceRegistryEntry, TelemetrySample};

/// Port for IoT platform interactions.
#[async_trait]
pub trait TelemetryService: Send + Sync {
    /// List every device in the registry, in the order the platform returns them.
    async fn list_devices(&self) -> Result<Vec<DeviceRegistryEntry>, TelemetryError>;

    /// Most recent cached events of one device, newest first.
    async fn last_events(
        &self,
        type_id: &str,
        device_id: &str,
    ) -> Result<Vec<TelemetrySample>, TelemetryError>;
}

/// IoT platform errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TelemetryError {
    /// No platform credentials are configured.
    #[error("telemetry service is not bound")]
    NotProvisioned,

    /// Credentials were rejected.
    #[error("telemetry authentication failed")]
    AuthenticationFailed,

    /// The platform answered with a non-success status.
    #[error("telemetry service rejected the request ({status}): {message}")]
    Rejected {
        /// Upstream HTTP status.
        status: u16,
        /// Upstream error text.
        message: String,
    },

    /// The platform could not be reached.
    #[error("telemetry service unreachable: {0}")]
    Network(String),

    /// The platform answered with a body that could not be understood.
    #[error("unexpected telemetry response: {0}")]
    Parse(String),
}

impl TelemetryError {
    /// Creates a rejection error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
