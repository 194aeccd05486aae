//! Dialog engine adapters.
//!
//! - `RestDialogService` - Dialog v1 REST API over reqwest
//! - `MockDialogService` - Scripted replies for tests

mod mock_dialog_service;
mod rest_dialog_service;

pub use mock_dialog_service::MockDialogService;
pub use rest_dialog_service::{RestDialogConfig, RestDialogService};
