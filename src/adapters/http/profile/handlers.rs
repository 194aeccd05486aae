//! HTTP handlers for the profile endpoint.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use crate::adapters::http::error::ApiError;
use crate::application::GetProfileHandler;

use super::dto::ProfileRequest;

/// State for the profile routes.
#[derive(Clone)]
pub struct ProfileAppState {
    pub handler: Arc<GetProfileHandler>,
}

impl ProfileAppState {
    pub fn new(handler: Arc<GetProfileHandler>) -> Self {
        Self { handler }
    }
}

/// POST /profile - Return the dialog engine's profile for a client
pub async fn get_profile(
    State(state): State<ProfileAppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state.handler.handle(request.into()).await?;
    Ok(Json(profile))
}
