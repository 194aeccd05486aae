//! Route configuration for the profile endpoint.

use axum::routing::post;
use axum::Router;

use super::handlers::{get_profile, ProfileAppState};

/// Creates the profile router.
///
/// Routes:
/// - `POST /profile` - Look up dialog profile variables
pub fn profile_routes(state: ProfileAppState) -> Router {
    Router::new()
        .route("/profile", post(get_profile))
        .with_state(state)
}
