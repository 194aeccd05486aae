//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ROOM_SENSOR` prefix and nested values use double underscores as separators.
//! Hosting-platform variables (`VCAP_SERVICES`, `VCAP_APP_PORT`, `PORT`,
//! `DIALOG_ID`) are layered on top where the explicit settings leave gaps.
//!
//! # Example
//!
//! ```no_run
//! use room_sensor_dialog::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod bound_services;
mod conversation;
mod dialog;
mod error;
mod server;
mod telemetry;

pub use bound_services::{platform_port, BoundServices, DialogCredentials, IotCredentials};
pub use conversation::{ComfortAdvisoryConfig, ConversationConfig};
pub use dialog::{DialogConfig, DialogIdSource, FALLBACK_DIALOG_ID};
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use telemetry::TelemetryConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Dialog engine configuration
    #[serde(default)]
    pub dialog: DialogConfig,

    /// IoT telemetry platform configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Trigger phrases, sentinel inputs and datapoint names
    #[serde(default)]
    pub conversation: ConversationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ROOM_SENSOR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    /// 5. Fills remaining gaps from hosting-platform variables
    ///
    /// # Environment Variable Format
    ///
    /// - `ROOM_SENSOR__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ROOM_SENSOR__DIALOG__USERNAME=...` -> `dialog.username = ...`
    /// - `ROOM_SENSOR__CONVERSATION__DEVICE_LIST_TRIGGERS=a|b` -> two phrases
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types or
    /// `VCAP_SERVICES` is not valid JSON.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let mut config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ROOM_SENSOR")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator("|")
                    .with_list_parse_key("conversation.device_list_triggers")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.apply_platform_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Layer hosting-platform variables under the explicit settings.
    ///
    /// `lookup` reads one environment variable; tests pass a fixed map.
    pub fn apply_platform_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if lookup("ROOM_SENSOR__SERVER__PORT").is_none() {
            if let Some(port) = platform_port(&lookup) {
                self.server.port = port;
            }
        }

        if self.dialog.dialog_id.is_none() {
            self.dialog.dialog_id = lookup("DIALOG_ID").filter(|id| !id.trim().is_empty());
        }

        let Some(raw) = lookup("VCAP_SERVICES").filter(|raw| !raw.trim().is_empty()) else {
            return Ok(());
        };
        let services = BoundServices::parse(&raw)?;

        if let Some(creds) = services.dialog_credentials() {
            fill(&mut self.dialog.username, creds.username);
            fill(&mut self.dialog.password, creds.password);
            if let Some(url) = creds.url.filter(|u| !u.is_empty()) {
                if lookup("ROOM_SENSOR__DIALOG__URL").is_none() {
                    self.dialog.url = url;
                }
            }
        }

        if let Some(creds) = services.iot_credentials() {
            if !self.telemetry.is_configured() {
                fill(&mut self.telemetry.org, creds.org);
                fill(&mut self.telemetry.api_key, creds.api_key);
                fill(&mut self.telemetry.api_token, creds.api_token);
                if let Some(host) = creds.http_host.filter(|h| !h.is_empty()) {
                    fill(&mut self.telemetry.base_url, Some(format!("https://{host}")));
                }
            }
        }

        Ok(())
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid, most
    /// notably when the dialog credentials are missing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.dialog.validate()?;
        self.telemetry.validate()?;
        self.conversation.validate()?;

        let required_secs = self.upstream_budget_secs();
        if self.server.request_timeout_secs <= required_secs {
            return Err(ValidationError::RequestTimeoutTooShort {
                request_secs: self.server.request_timeout_secs,
                required_secs,
            });
        }
        Ok(())
    }

    /// Longest time one conversation turn can spend waiting on upstreams.
    ///
    /// A sensor read makes three dialog calls and one telemetry call; the
    /// request deadline must outlast all of them.
    pub fn upstream_budget_secs(&self) -> u64 {
        3 * self.dialog.timeout_secs + self.telemetry.timeout_secs
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.as_ref().map_or(true, |s| s.is_empty()) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            *slot = Some(value);
        }
    }
}
