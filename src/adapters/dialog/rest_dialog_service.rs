//! REST Dialog Service - Implementation of DialogService for the dialog v1 API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = RestDialogConfig::new(url, dialog_id, username, password)
//!     .with_timeout(Duration::from_secs(10));
//!
//! let dialog = RestDialogService::new(config)?;
//! ```
//!
//! # Endpoints
//!
//! - `POST {url}/v1/dialogs/{dialog_id}/conversation` (form encoded)
//! - `PUT {url}/v1/dialogs/{dialog_id}/profile` (JSON)
//! - `GET {url}/v1/dialogs/{dialog_id}/profile?client_id=..&name=..`
//!
//! All requests use HTTP basic auth. Nothing is retried.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::time::Duration;

use crate::config::DialogConfig;
use crate::domain::{ConversationTurn, DialogResponse, ProfileQuery, ProfileUpdate};
use crate::ports::{DialogError, DialogService};

/// Form fields owned by the session; caller-supplied extras never override them.
const RESERVED_FIELDS: [&str; 4] = ["input", "client_id", "conversation_id", "dialog_id"];

/// Configuration for the REST dialog service.
#[derive(Debug, Clone)]
pub struct RestDialogConfig {
    /// Base URL (e.g. https://gateway.watsonplatform.net/dialog/api).
    pub base_url: String,
    /// Dialog to converse with.
    pub dialog_id: String,
    /// Basic auth user name.
    pub username: String,
    /// Basic auth password.
    password: Secret<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl RestDialogConfig {
    /// Creates a new configuration.
    pub fn new(
        base_url: impl Into<String>,
        dialog_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            dialog_id: dialog_id.into(),
            username: username.into(),
            password: Secret::new(password.into()),
            timeout: Duration::from_secs(30),
        }
    }

    /// Builds the adapter configuration from validated application config.
    pub fn from_config(config: &DialogConfig, dialog_id: impl Into<String>) -> Self {
        Self::new(
            config.url.clone(),
            dialog_id,
            config.username.clone().unwrap_or_default(),
            config.password.clone().unwrap_or_default(),
        )
        .with_timeout(config.timeout())
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

/// Dialog v1 REST API client.
pub struct RestDialogService {
    config: RestDialogConfig,
    client: Client,
}

impl RestDialogService {
    /// Creates a new dialog client with the given configuration.
    pub fn new(config: RestDialogConfig) -> Result<Self, DialogError> {
        Url::parse(&config.base_url)
            .map_err(|e| DialogError::network(format!("Invalid dialog URL: {}", e)))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DialogError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds `{base}/v1/dialogs/{dialog_id}/{resource}`.
    fn endpoint(&self, resource: &str) -> Result<Url, DialogError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| DialogError::network(format!("Invalid dialog URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| DialogError::network("Dialog URL cannot be a base"))?
            .pop_if_empty()
            .extend(["v1", "dialogs", self.config.dialog_id.as_str(), resource]);
        Ok(url)
    }

    /// Form fields for one conversation turn.
    fn conversation_form(turn: &ConversationTurn) -> Vec<(String, String)> {
        let mut form = vec![("input".to_string(), turn.input.clone())];
        if let Some(ref client_id) = turn.client_id {
            form.push(("client_id".to_string(), client_id.to_string()));
        }
        if let Some(ref conversation_id) = turn.conversation_id {
            form.push(("conversation_id".to_string(), conversation_id.to_string()));
        }
        for (name, value) in &turn.profile_values {
            if RESERVED_FIELDS.contains(&name.as_str()) || value.is_null() {
                continue;
            }
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            form.push((name.clone(), value));
        }
        form
    }

    /// Maps transport failures to dialog errors.
    fn map_send_error(&self, e: reqwest::Error) -> DialogError {
        if e.is_timeout() {
            DialogError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if e.is_connect() {
            DialogError::network(format!("Connection failed: {}", e))
        } else {
            DialogError::network(e.to_string())
        }
    }

    /// Parses the API response status and handles errors.
    async fn handle_response_status(response: Response) -> Result<Response, DialogError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(DialogError::AuthenticationFailed),
            code => Err(DialogError::rejected(code, Self::error_message(&error_body))),
        }
    }

    /// Pulls the human-readable message out of an error body.
    fn error_message(error_body: &str) -> String {
        if let Ok(parsed) = serde_json::from_str::<Value>(error_body) {
            for key in ["error", "message", "description"] {
                if let Some(msg) = parsed.get(key).and_then(Value::as_str) {
                    return msg.to_string();
                }
            }
        }
        error_body.trim().to_string()
    }
}

#[async_trait]
impl DialogService for RestDialogService {
    async fn converse(&self, turn: &ConversationTurn) -> Result<DialogResponse, DialogError> {
        let url = self.endpoint("conversation")?;
        tracing::debug!(dialog_id = %self.config.dialog_id, input = %turn.input, "Sending dialog turn");

        let response = self
            .client
            .post(url)
            .basic_auth(&self.config.username, Some(self.config.password()))
            .form(&Self::conversation_form(turn))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::handle_response_status(response).await?;

        response
            .json::<DialogResponse>()
            .await
            .map_err(|e| DialogError::parse(format!("Failed to parse conversation: {}", e)))
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), DialogError> {
        let url = self.endpoint("profile")?;
        tracing::debug!(
            dialog_id = %self.config.dialog_id,
            variables = update.name_values.len(),
            "Updating dialog profile"
        );

        let response = self
            .client
            .put(url)
            .basic_auth(&self.config.username, Some(self.config.password()))
            .json(update)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        Self::handle_response_status(response).await?;
        Ok(())
    }

    async fn get_profile(&self, query: &ProfileQuery) -> Result<Value, DialogError> {
        let url = self.endpoint("profile")?;

        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(ref client_id) = query.client_id {
            params.push(("client_id", client_id.to_string()));
        }
        for name in &query.names {
            params.push(("name", name.clone()));
        }

        let response = self
            .client
            .get(url)
            .basic_auth(&self.config.username, Some(self.config.password()))
            .query(&params)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::handle_response_status(response).await?;

        response
            .json::<Value>()
            .await
            .map_err(|e| DialogError::parse(format!("Failed to parse profile: {}", e)))
    }

    fn dialog_id(&self) -> &str {
        &self.config.dialog_id
    }
}
