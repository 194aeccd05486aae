//! Dialog Service Port - Interface for the hosted conversation engine.
//!
//! The engine owns all language understanding; this port only moves turns in
//! and scripted text out, and reads or writes the per-client profile variables
//! the script uses.
//!
//! # Example
//!
//! ```ignore
//! let reply = dialog.converse(&ConversationTurn::new("where are the offices")).await?;
//! println!("{}", reply.text());
//! ```

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{ConversationTurn, DialogResponse, ProfileQuery, ProfileUpdate};

/// Port for dialog engine interactions.
#[async_trait]
pub trait DialogService: Send + Sync {
    /// Send one turn and receive the scripted reply.
    async fn converse(&self, turn: &ConversationTurn) -> Result<DialogResponse, DialogError>;

    /// Store profile variables for a dialog client.
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), DialogError>;

    /// Read profile variables for a dialog client, returned as the engine sent them.
    async fn get_profile(&self, query: &ProfileQuery) -> Result<Value, DialogError>;

    /// Dialog this service talks to.
    fn dialog_id(&self) -> &str;
}

/// Dialog engine errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    /// Credentials were rejected.
    #[error("dialog authentication failed")]
    AuthenticationFailed,

    /// The engine answered with a non-success status.
    #[error("dialog service rejected the request ({status}): {message}")]
    Rejected {
        /// Upstream HTTP status.
        status: u16,
        /// Upstream error text.
        message: String,
    },

    /// The engine could not be reached.
    #[error("dialog service unreachable: {0}")]
    Network(String),

    /// The engine did not answer in time.
    #[error("dialog request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// The engine answered with a body that could not be understood.
    #[error("unexpected dialog response: {0}")]
    Parse(String),
}

impl DialogError {
    /// Creates a rejection error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
