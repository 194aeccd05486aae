//! HTTP handlers for the conversation endpoint.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use crate::adapters::http::error::ApiError;
use crate::application::HandleConversationHandler;

use super::dto::{ConversationReply, ConversationRequest};

/// State for the conversation routes.
#[derive(Clone)]
pub struct ConversationAppState {
    pub handler: Arc<HandleConversationHandler>,
}

impl ConversationAppState {
    pub fn new(handler: Arc<HandleConversationHandler>) -> Self {
        Self { handler }
    }
}

/// POST /conversation - Run one conversation turn
pub async fn converse(
    State(state): State<ConversationAppState>,
    Json(request): Json<ConversationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.handler.handle(request.into()).await?;

    Ok(Json(ConversationReply {
        dialog_id: state.handler.dialog_id().to_string(),
        conversation: outcome.conversation,
    }))
}
