//! HTTP adapter for the conversation endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{ConversationReply, ConversationRequest};
pub use handlers::{converse, ConversationAppState};
pub use routes::conversation_routes;
