//! Conversation command and query handlers.

mod device_cache;
mod get_profile;
mod handle_conversation;

pub use device_cache::SharedDeviceDirectory;
pub use get_profile::GetProfileHandler;
pub use handle_conversation::{
    ConversationError, ConversationOutcome, ConversationRoute, ConversationSettings,
    HandleConversationHandler, REGISTRY_UNAVAILABLE_NOTICE,
};
