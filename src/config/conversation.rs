//! Conversation flow configuration
//!
//! Everything the orchestrator matches on or sends back to the dialog engine
//! lives here so a different dialog script or sensor type only needs new
//! settings.

use serde::Deserialize;

use super::error::ValidationError;

/// Conversation flow configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    /// Phrases in the dialog text that ask for the device list
    #[serde(default = "default_device_list_triggers")]
    pub device_list_triggers: Vec<String>,

    /// Marker in the dialog text that asks for a sensor reading
    #[serde(default = "default_value_marker")]
    pub value_marker: String,

    /// Device metadata key used as the human-readable label
    #[serde(default = "default_device_label_key")]
    pub device_label_key: String,

    /// Datapoint read from the latest device event
    #[serde(default = "default_datapoint")]
    pub datapoint: String,

    /// Dialog profile variable that receives the reading
    #[serde(default = "default_profile_variable")]
    pub profile_variable: String,

    /// Input that makes the dialog phrase the stored reading
    #[serde(default = "default_sensor_value_input")]
    pub sensor_value_input: String,

    /// Input that makes the dialog report an unknown device
    #[serde(default = "default_no_device_input")]
    pub no_device_input: String,

    /// Optional advisory appended to numeric readings
    #[serde(default)]
    pub comfort_advisory: ComfortAdvisoryConfig,
}

/// Comfort advisory thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct ComfortAdvisoryConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Readings below this are reported as cold
    #[serde(default = "default_min")]
    pub min: f64,

    /// Readings above this are reported as hot
    #[serde(default = "default_max")]
    pub max: f64,
}

impl ConversationConfig {
    /// Validate conversation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.device_list_triggers.iter().all(|t| t.trim().is_empty()) {
            return Err(ValidationError::NoTriggerPhrases);
        }
        let required = [
            (&self.value_marker, "CONVERSATION__VALUE_MARKER"),
            (&self.datapoint, "CONVERSATION__DATAPOINT"),
            (&self.profile_variable, "CONVERSATION__PROFILE_VARIABLE"),
            (&self.sensor_value_input, "CONVERSATION__SENSOR_VALUE_INPUT"),
            (&self.no_device_input, "CONVERSATION__NO_DEVICE_INPUT"),
        ];
        for (value, name) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingRequired(name));
            }
        }
        self.comfort_advisory.validate()
    }
}

impl ComfortAdvisoryConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min > self.max {
            return Err(ValidationError::InvalidComfortRange);
        }
        Ok(())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            device_list_triggers: default_device_list_triggers(),
            value_marker: default_value_marker(),
            device_label_key: default_device_label_key(),
            datapoint: default_datapoint(),
            profile_variable: default_profile_variable(),
            sensor_value_input: default_sensor_value_input(),
            no_device_input: default_no_device_input(),
            comfort_advisory: ComfortAdvisoryConfig::default(),
        }
    }
}

impl Default for ComfortAdvisoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            min: default_min(),
            max: default_max(),
        }
    }
}

fn default_device_list_triggers() -> Vec<String> {
    vec![
        "could be in one of the following office(s)".to_string(),
        "here are the list of offices".to_string(),
    ]
}

fn default_value_marker() -> String {
    "VALUE".to_string()
}

fn default_device_label_key() -> String {
    "Office Number".to_string()
}

fn default_datapoint() -> String {
    "temperature".to_string()
}

fn default_profile_variable() -> String {
    "value".to_string()
}

fn default_sensor_value_input() -> String {
    "DISPLAY SENSOR VALUE".to_string()
}

fn default_no_device_input() -> String {
    "DISPLAY NO DEVICE".to_string()
}

fn default_min() -> f64 {
    19.0
}

fn default_max() -> f64 {
    25.0
}
