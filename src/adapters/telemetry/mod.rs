//! IoT telemetry adapters.
//!
//! - `RestTelemetryService` - IoT platform v0002 REST API over reqwest
//! - `UnboundTelemetryService` - Used when no platform credentials are configured
//! - `MockTelemetryService` - Fixed registry and events for tests

mod mock_telemetry_service;
mod rest_telemetry_service;
mod unbound_telemetry_service;

pub use mock_telemetry_service::{MockTelemetryService, TelemetryCall};
pub use rest_telemetry_service::{RestTelemetryConfig, RestTelemetryService};
pub use unbound_telemetry_service::UnboundTelemetryService;
