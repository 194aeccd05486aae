//! Device registry entries and the label directory built from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// One device as listed by the IoT platform registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRegistryEntry {
    pub device_id: String,
    #[serde(default)]
    pub type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl DeviceRegistryEntry {
    pub fn new(type_id: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            type_id: type_id.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Name people use for this device: the `label_key` metadata value when
    /// it is a non-empty string or a number, otherwise the device id.
    pub fn label(&self, label_key: &str) -> String {
        let from_metadata = self
            .metadata
            .as_ref()
            .and_then(|m| m.get(label_key))
            .and_then(|v| match v {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
        from_metadata.unwrap_or_else(|| self.device_id.clone())
    }
}

/// Label -> device map built from one registry listing.
///
/// Labels keep the order in which the registry first reported them. When two
/// devices share a label the later one replaces the earlier in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceDirectory {
    labels: Vec<String>,
    entries: HashMap<String, DeviceRegistryEntry>,
}

impl DeviceDirectory {
    pub fn from_registry<I>(devices: I, label_key: &str) -> Self
    where
        I: IntoIterator<Item = DeviceRegistryEntry>,
    {
        let mut directory = Self::default();
        for device in devices {
            let label = device.label(label_key);
            if directory.entries.insert(label.clone(), device).is_none() {
                directory.labels.push(label);
            }
        }
        directory
    }

    /// Labels in registry order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, label: &str) -> Option<&DeviceRegistryEntry> {
        self.entries.get(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
