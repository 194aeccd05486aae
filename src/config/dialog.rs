//! Dialog service configuration

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::ValidationError;

/// Dialog id used when neither the dialog file nor the environment names one.
pub const FALLBACK_DIALOG_ID: &str = "bbe01ff1-296e-48cc-a38c-e96f046a6bcf";

/// Dialog service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DialogConfig {
    /// Base URL of the dialog REST API (without the version segment)
    #[serde(default = "default_url")]
    pub url: String,

    /// Basic auth user name
    pub username: Option<String>,

    /// Basic auth password
    pub password: Option<String>,

    /// Dialog id supplied through the environment
    pub dialog_id: Option<String>,

    /// JSON file produced when the dialog was uploaded
    #[serde(default = "default_dialog_id_file")]
    pub dialog_id_file: PathBuf,

    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Where the effective dialog id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogIdSource {
    File,
    Environment,
    Fallback,
}

impl fmt::Display for DialogIdSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialogIdSource::File => write!(f, "file"),
            DialogIdSource::Environment => write!(f, "environment"),
            DialogIdSource::Fallback => write!(f, "fallback"),
        }
    }
}

impl DialogConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if basic auth credentials are present
    pub fn has_credentials(&self) -> bool {
        self.username.as_ref().is_some_and(|u| !u.is_empty())
            && self.password.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Resolve the dialog id: dialog file first, then environment, then the fallback.
    pub fn resolve_dialog_id(&self) -> (String, DialogIdSource) {
        if let Some(id) = read_dialog_id_file(&self.dialog_id_file) {
            return (id, DialogIdSource::File);
        }
        if let Some(id) = self.dialog_id.as_ref().filter(|id| !id.trim().is_empty()) {
            return (id.trim().to_string(), DialogIdSource::Environment);
        }
        (FALLBACK_DIALOG_ID.to_string(), DialogIdSource::Fallback)
    }

    /// Validate dialog configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ValidationError::InvalidDialogUrl);
        }
        if !self.username.as_ref().is_some_and(|u| !u.is_empty()) {
            return Err(ValidationError::MissingRequired("DIALOG__USERNAME"));
        }
        if !self.password.as_ref().is_some_and(|p| !p.is_empty()) {
            return Err(ValidationError::MissingRequired("DIALOG__PASSWORD"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

/// Reads `{"<name>": {"id": "..."}}` and returns the id of the first entry.
///
/// A missing or unreadable file is not an error; the next source is tried.
fn read_dialog_id_file(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let parsed: serde_json::Map<String, serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed dialog id file");
            return None;
        }
    };
    parsed
        .values()
        .next()
        .and_then(|entry| entry.get("id"))
        .and_then(|id| id.as_str())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: None,
            password: None,
            dialog_id: None,
            dialog_id_file: default_dialog_id_file(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_url() -> String {
    "https://gateway.watsonplatform.net/dialog/api".to_string()
}

fn default_dialog_id_file() -> PathBuf {
    PathBuf::from("dialogs").join("dialog-id.json")
}

fn default_timeout() -> u64 {
    30
}
