//! Application handlers.
//!
//! Command and query handlers that orchestrate the dialog and telemetry ports.

pub mod conversation;

pub use conversation::{
    ConversationError, ConversationOutcome, ConversationRoute, ConversationSettings,
    GetProfileHandler, HandleConversationHandler, SharedDeviceDirectory,
    REGISTRY_UNAVAILABLE_NOTICE,
};
