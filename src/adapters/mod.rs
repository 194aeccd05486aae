//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `dialog` - Dialog engine clients (REST, mock)
//! - `telemetry` - IoT platform clients (REST, unbound, mock)
//! - `http` - Inbound REST endpoints

pub mod dialog;
pub mod http;
pub mod telemetry;

pub use dialog::{MockDialogService, RestDialogConfig, RestDialogService};
pub use telemetry::{
    MockTelemetryService, RestTelemetryConfig, RestTelemetryService, UnboundTelemetryService,
};
