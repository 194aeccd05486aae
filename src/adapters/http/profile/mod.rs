//! HTTP adapter for the profile endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{ProfileNames, ProfileRequest};
pub use handlers::{get_profile, ProfileAppState};
pub use routes::profile_routes;
