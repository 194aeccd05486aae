//! Domain layer containing the value types and pure rules of the service.
//!
//! # Module Organization
//!
//! - `conversation` - Turns, dialog replies and profile variables
//! - `device` - Registry entries and the label directory
//! - `reading` - Telemetry events and decoded sensor readings
//! - `intent` - Trigger matching over dialog text
//! - `advisory` - Optional comfort note for temperature readings

pub mod advisory;
pub mod conversation;
pub mod device;
pub mod intent;
pub mod reading;

pub use advisory::ComfortAdvisory;
pub use conversation::{
    ConversationTurn, DialogRef, DialogResponse, ProfileQuery, ProfileUpdate, ProfileValue,
};
pub use device::{DeviceDirectory, DeviceRegistryEntry};
pub use intent::{device_name, DialogIntent, IntentMatcher};
pub use reading::{ReadingFailure, SensorReading, TelemetrySample};
