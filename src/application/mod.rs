//! Application layer - Commands, Queries, and Handlers.
//!
//! Handlers coordinate the dialog and telemetry ports for one request each.
//! The device directory is the only state kept between requests.

pub mod handlers;

pub use handlers::{
    ConversationError, ConversationOutcome, ConversationRoute, ConversationSettings,
    GetProfileHandler, HandleConversationHandler, SharedDeviceDirectory,
    REGISTRY_UNAVAILABLE_NOTICE,
};
