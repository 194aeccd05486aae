//! Mock Telemetry Service for testing.
//!
//! Holds a fixed registry and per-device event lists, with error injection
//! and a call log so tests can assert that no telemetry call was made.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::{DeviceRegistryEntry, TelemetrySample};
use crate::ports::{TelemetryError, TelemetryService};

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelemetryCall {
    ListDevices,
    LastEvents { type_id: String, device_id: String },
}

/// Mock IoT platform.
#[derive(Debug, Clone)]
pub struct MockTelemetryService {
    registry: Arc<Mutex<Result<Vec<DeviceRegistryEntry>, TelemetryError>>>,
    events: Arc<Mutex<HashMap<(String, String), Result<Vec<TelemetrySample>, TelemetryError>>>>,
    calls: Arc<Mutex<Vec<TelemetryCall>>>,
}

impl Default for MockTelemetryService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTelemetryService {
    /// Creates a mock with an empty registry.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Ok(Vec::new()))),
            events: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets the registry listing.
    pub fn with_devices(self, devices: Vec<DeviceRegistryEntry>) -> Self {
        *self.registry.lock().unwrap() = Ok(devices);
        self
    }

    /// Makes the registry listing fail.
    pub fn with_registry_error(self, error: TelemetryError) -> Self {
        *self.registry.lock().unwrap() = Err(error);
        self
    }

    /// Sets the cached events of one device.
    pub fn with_events(
        self,
        type_id: impl Into<String>,
        device_id: impl Into<String>,
        samples: Vec<TelemetrySample>,
    ) -> Self {
        self.events
            .lock()
            .unwrap()
            .insert((type_id.into(), device_id.into()), Ok(samples));
        self
    }

    /// Makes the event lookup of one device fail.
    pub fn with_events_error(
        self,
        type_id: impl Into<String>,
        device_id: impl Into<String>,
        error: TelemetryError,
    ) -> Self {
        self.events
            .lock()
            .unwrap()
            .insert((type_id.into(), device_id.into()), Err(error));
        self
    }

    /// Calls received, in order.
    pub fn calls(&self) -> Vec<TelemetryCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TelemetryService for MockTelemetryService {
    async fn list_devices(&self) -> Result<Vec<DeviceRegistryEntry>, TelemetryError> {
        self.calls.lock().unwrap().push(TelemetryCall::ListDevices);
        self.registry.lock().unwrap().clone()
    }

    async fn last_events(
        &self,
        type_id: &str,
        device_id: &str,
    ) -> Result<Vec<TelemetrySample>, TelemetryError> {
        self.calls.lock().unwrap().push(TelemetryCall::LastEvents {
            type_id: type_id.to_string(),
            device_id: device_id.to_string(),
        });
        self.events
            .lock()
            .unwrap()
            .get(&(type_id.to_string(), device_id.to_string()))
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
