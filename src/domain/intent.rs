//! Decides what the dialog engine's reply is asking this service to do.
//!
//! The dialog script signals follow-up work through plain text: a device-list
//! phrase asks for the registry, and a value marker asks for a reading of the
//! device named before the first comma.

/// Follow-up work requested by a dialog reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogIntent {
    /// Reply with the labels of all registered devices.
    ListDevices,
    /// Reply with the latest reading of the named device.
    ReadSensor { device_name: String },
    /// Pass the reply through untouched.
    Reply,
}

/// Substring matcher over the joined dialog text.
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    device_list_triggers: Vec<String>,
    value_marker: String,
}

impl IntentMatcher {
    pub fn new<I, S>(device_list_triggers: I, value_marker: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            device_list_triggers: device_list_triggers
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
            value_marker: value_marker.into(),
        }
    }

    /// Device-list phrases take precedence over the value marker.
    pub fn classify(&self, text: &str) -> DialogIntent {
        if self
            .device_list_triggers
            .iter()
            .any(|trigger| text.contains(trigger.as_str()))
        {
            return DialogIntent::ListDevices;
        }
        if !self.value_marker.is_empty() && text.contains(self.value_marker.as_str()) {
            return DialogIntent::ReadSensor {
                device_name: device_name(text).to_string(),
            };
        }
        DialogIntent::Reply
    }
}

/// Text before the first comma, taken as is. The whole text when there is no comma.
pub fn device_name(text: &str) -> &str {
    text.split(',').next().unwrap_or(text)
}
