//! GetProfileHandler - Query handler for dialog profile variables.

use serde_json::Value;
use std::sync::Arc;

use crate::domain::ProfileQuery;
use crate::ports::DialogService;

use super::handle_conversation::ConversationError;

/// Handler for profile lookups.
///
/// The dialog engine owns the profile, so the lookup is forwarded as is and
/// its JSON returned unchanged.
pub struct GetProfileHandler {
    dialog: Arc<dyn DialogService>,
}

impl GetProfileHandler {
    pub fn new(dialog: Arc<dyn DialogService>) -> Self {
        Self { dialog }
    }

    pub async fn handle(&self, query: ProfileQuery) -> Result<Value, ConversationError> {
        tracing::debug!(
            client_id = ?query.client_id,
            names = query.names.len(),
            "Fetching dialog profile"
        );
        Ok(self.dialog.get_profile(&query).await?)
    }
}
