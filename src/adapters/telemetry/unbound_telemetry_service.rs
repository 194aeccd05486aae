//! Stand-in used when no IoT platform credentials are configured.

use async_trait::async_trait;

use crate::domain::{DeviceRegistryEntry, TelemetrySample};
use crate::ports::{TelemetryError, TelemetryService};

/// Telemetry service that is not bound to any platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnboundTelemetryService;

#[async_trait]
impl TelemetryService for UnboundTelemetryService {
    async fn list_devices(&self) -> Result<Vec<DeviceRegistryEntry>, TelemetryError> {
        Err(TelemetryError::NotProvisioned)
    }

    async fn last_events(
        &self,
        _type_id: &str,
        _device_id: &str,
    ) -> Result<Vec<TelemetrySample>, TelemetryError> {
        Err(TelemetryError::NotProvisioned)
    }
}
