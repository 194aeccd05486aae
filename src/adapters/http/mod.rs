//! HTTP adapters - REST API implementations.
//!
//! Each endpoint has its own module with DTOs, handlers and routes;
//! `app_router` mounts them behind the request deadline and the shared
//! tower-http layers.

pub mod conversation;
pub mod error;
pub mod middleware;
pub mod profile;
mod router;

pub use conversation::{conversation_routes, ConversationAppState};
pub use error::{ApiError, ErrorResponse};
pub use profile::{profile_routes, ProfileAppState};
pub use router::app_router;
