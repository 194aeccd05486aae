//! Mock Dialog Service for testing.
//!
//! Replies are scripted per input text, the same way a dialog file maps
//! inputs to outputs, so sentinel re-queries can be scripted alongside the
//! user utterance.
//!
//! # Example
//!
//! ```ignore
//! let dialog = MockDialogService::new("dlg-1")
//!     .with_reply("where are the offices", ["here are the list of offices"])
//!     .with_reply("DISPLAY NO DEVICE", ["I could not find that office"]);
//! ```

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::{ConversationTurn, DialogResponse, ProfileQuery, ProfileUpdate, ProfileValue};
use crate::ports::{DialogError, DialogService};

/// Mock dialog engine with scripted replies and call tracking.
#[derive(Debug, Clone)]
pub struct MockDialogService {
    dialog_id: String,
    replies: Arc<Mutex<HashMap<String, Result<DialogResponse, DialogError>>>>,
    profile_error: Arc<Mutex<Option<DialogError>>>,
    profile: Arc<Mutex<Vec<ProfileValue>>>,
    turns: Arc<Mutex<Vec<ConversationTurn>>>,
    updates: Arc<Mutex<Vec<ProfileUpdate>>>,
    queries: Arc<Mutex<Vec<ProfileQuery>>>,
}

impl MockDialogService {
    /// Creates a mock with no scripted replies.
    pub fn new(dialog_id: impl Into<String>) -> Self {
        Self {
            dialog_id: dialog_id.into(),
            replies: Arc::new(Mutex::new(HashMap::new())),
            profile_error: Arc::new(Mutex::new(None)),
            profile: Arc::new(Mutex::new(Vec::new())),
            turns: Arc::new(Mutex::new(Vec::new())),
            updates: Arc::new(Mutex::new(Vec::new())),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Scripts the reply segments for an input.
    pub fn with_reply<I, S>(self, input: impl Into<String>, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_response(input, DialogResponse::from_segments(segments))
    }

    /// Scripts a full reply for an input.
    pub fn with_response(self, input: impl Into<String>, response: DialogResponse) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(input.into(), Ok(response));
        self
    }

    /// Scripts an error for an input.
    pub fn with_error(self, input: impl Into<String>, error: DialogError) -> Self {
        self.replies.lock().unwrap().insert(input.into(), Err(error));
        self
    }

    /// Makes every profile update and lookup fail.
    pub fn with_profile_error(self, error: DialogError) -> Self {
        *self.profile_error.lock().unwrap() = Some(error);
        self
    }

    /// Turns received, in order.
    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.turns.lock().unwrap().clone()
    }

    /// Inputs received, in order.
    pub fn inputs(&self) -> Vec<String> {
        self.turns
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.input.clone())
            .collect()
    }

    /// Profile updates received, in order.
    pub fn profile_updates(&self) -> Vec<ProfileUpdate> {
        self.updates.lock().unwrap().clone()
    }

    /// Profile lookups received, in order.
    pub fn profile_queries(&self) -> Vec<ProfileQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl DialogService for MockDialogService {
    async fn converse(&self, turn: &ConversationTurn) -> Result<DialogResponse, DialogError> {
        self.turns.lock().unwrap().push(turn.clone());

        let scripted = self.replies.lock().unwrap().get(&turn.input).cloned();
        let mut response = scripted.unwrap_or_else(|| {
            Err(DialogError::rejected(
                404,
                format!("no scripted reply for input '{}'", turn.input),
            ))
        })?;

        response.input = Some(turn.input.clone());
        if response.client_id.is_none() {
            response.client_id = turn.client_id.clone();
        }
        if response.conversation_id.is_none() {
            response.conversation_id = turn.conversation_id.clone();
        }
        Ok(response)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), DialogError> {
        self.updates.lock().unwrap().push(update.clone());
        if let Some(err) = self.profile_error.lock().unwrap().clone() {
            return Err(err);
        }

        let mut profile = self.profile.lock().unwrap();
        for value in &update.name_values {
            match profile.iter_mut().find(|v| v.name == value.name) {
                Some(existing) => existing.value = value.value.clone(),
                None => profile.push(value.clone()),
            }
        }
        Ok(())
    }

    async fn get_profile(&self, query: &ProfileQuery) -> Result<Value, DialogError> {
        self.queries.lock().unwrap().push(query.clone());
        if let Some(err) = self.profile_error.lock().unwrap().clone() {
            return Err(err);
        }

        let profile = self.profile.lock().unwrap();
        let name_values: Vec<&ProfileValue> = profile
            .iter()
            .filter(|v| query.names.is_empty() || query.names.contains(&v.name))
            .collect();
        Ok(json!({
            "client_id": query.client_id,
            "name_values": name_values,
        }))
    }

    fn dialog_id(&self) -> &str {
        &self.dialog_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DialogRef;

    #[tokio::test]
    async fn scripted_reply_is_returned() {
        let dialog = MockDialogService::new("dlg").with_reply("hi", ["Hello there"]);
        let turn = ConversationTurn::new("hi").with_session(DialogRef::from(1), DialogRef::from(2));

        let reply = dialog.converse(&turn).await.unwrap();

        assert_eq!(reply.response, vec!["Hello there".to_string()]);
        assert_eq!(reply.client_id, Some(DialogRef::from(1)));
        assert_eq!(dialog.inputs(), vec!["hi".to_string()]);
    }

    #[tokio::test]
    async fn unscripted_input_is_rejected() {
        let dialog = MockDialogService::new("dlg");
        let err = dialog.converse(&ConversationTurn::new("?")).await.unwrap_err();
        assert!(matches!(err, DialogError::Rejected { status: 404, .. }));
    }

    #[tokio::test]
    async fn profile_updates_are_readable() {
        let dialog = MockDialogService::new("dlg");
        let update = ProfileUpdate {
            client_id: Some(DialogRef::from(5)),
            name_values: vec![ProfileValue::new("value", "21")],
        };
        dialog.update_profile(&update).await.unwrap();

        let profile = dialog
            .get_profile(&ProfileQuery {
                client_id: Some(DialogRef::from(5)),
                names: vec![],
            })
            .await
            .unwrap();

        assert_eq!(profile["name_values"][0]["value"], "21");
        assert_eq!(dialog.profile_updates().len(), 1);
    }
}
