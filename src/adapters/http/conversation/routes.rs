//! Route configuration for the conversation endpoint.

use axum::routing::post;
use axum::Router;

use super::handlers::{converse, ConversationAppState};

/// Creates the conversation router.
///
/// Routes:
/// - `POST /conversation` - Forward a turn to the dialog engine
pub fn conversation_routes(state: ConversationAppState) -> Router {
    Router::new()
        .route("/conversation", post(converse))
        .with_state(state)
}
