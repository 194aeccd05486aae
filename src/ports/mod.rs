//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `DialogService` - Hosted conversation engine
//! - `TelemetryService` - IoT device registry and last-event cache

mod dialog_service;
mod telemetry_service;

pub use dialog_service::{DialogError, DialogService};
pub use telemetry_service::{TelemetryError, TelemetryService};
