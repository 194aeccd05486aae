//! Conversation value types exchanged with the dialog engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier handed out by the dialog engine.
///
/// The engine issues numeric ids but clients often echo them back as strings,
/// so both shapes are accepted and the original shape is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DialogRef {
    Number(u64),
    Text(String),
}

impl fmt::Display for DialogRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogRef::Number(n) => write!(f, "{n}"),
            DialogRef::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for DialogRef {
    fn from(n: u64) -> Self {
        DialogRef::Number(n)
    }
}

impl From<&str> for DialogRef {
    fn from(s: &str) -> Self {
        DialogRef::Text(s.to_string())
    }
}

/// One user utterance, plus the session it belongs to.
///
/// Built once per request and never mutated; sentinel re-queries derive a
/// new turn through [`ConversationTurn::with_input`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationTurn {
    pub client_id: Option<DialogRef>,
    pub conversation_id: Option<DialogRef>,
    pub input: String,
    /// Any further fields the caller sent along; forwarded untouched.
    pub profile_values: Map<String, Value>,
}

impl ConversationTurn {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            client_id: None,
            conversation_id: None,
            input: input.into(),
            profile_values: Map::new(),
        }
    }

    pub fn with_session(mut self, client_id: DialogRef, conversation_id: DialogRef) -> Self {
        self.client_id = Some(client_id);
        self.conversation_id = Some(conversation_id);
        self
    }

    /// Same session and profile fields, different input.
    pub fn with_input(&self, input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..self.clone()
        }
    }
}

/// Reply from the dialog engine.
///
/// Only `response` is ever rewritten by this service; every other field,
/// including ones this crate does not know about, is passed back as received.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DialogResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<DialogRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<DialogRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub response: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DialogResponse {
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            response: segments.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// All segments joined with a single space.
    pub fn text(&self) -> String {
        self.response.join(" ")
    }
}

/// A single dialog profile variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileValue {
    pub name: String,
    pub value: String,
}

impl ProfileValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Profile variables to store for one dialog client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<DialogRef>,
    pub name_values: Vec<ProfileValue>,
}

/// Profile lookup for one dialog client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileQuery {
    pub client_id: Option<DialogRef>,
    /// Variable names to return; empty means all of them.
    pub names: Vec<String>,
}
