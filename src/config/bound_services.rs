//! Hosting-platform overlays.
//!
//! Cloud Foundry style platforms hand bound service credentials to the
//! process through `VCAP_SERVICES` and the listening port through
//! `VCAP_APP_PORT` (or `PORT`). Explicit `ROOM_SENSOR__*` settings always win;
//! platform values only fill gaps.

use serde::Deserialize;
use std::collections::HashMap;

/// Service label for the dialog engine
pub const DIALOG_SERVICE_LABEL: &str = "dialog";

/// Service label for the IoT platform
pub const IOT_SERVICE_LABEL: &str = "iotf-service";

/// Parsed `VCAP_SERVICES` document: label -> bound instances.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct BoundServices(HashMap<String, Vec<BoundService>>);

/// One bound service instance.
#[derive(Debug, Clone, Deserialize)]
pub struct BoundService {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub credentials: serde_json::Value,
}

/// Dialog credentials found in the bound service metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DialogCredentials {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// IoT platform credentials found in the bound service metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IotCredentials {
    pub org: Option<String>,
    pub api_key: Option<String>,
    pub api_token: Option<String>,
    #[serde(rename = "http_host")]
    pub http_host: Option<String>,
}

impl BoundServices {
    /// Parses a raw `VCAP_SERVICES` value.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Credentials of the first instance whose label starts with `label`.
    fn credentials_for(&self, label: &str) -> Option<&serde_json::Value> {
        let mut labels: Vec<&String> = self.0.keys().filter(|k| k.starts_with(label)).collect();
        // Exact label first, then the rest in a stable order.
        labels.sort_by_key(|k| (k.as_str() != label, k.as_str()));
        labels
            .into_iter()
            .filter_map(|k| self.0.get(k))
            .flat_map(|instances| instances.iter())
            .map(|instance| &instance.credentials)
            .find(|credentials| credentials.is_object())
    }

    pub fn dialog_credentials(&self) -> Option<DialogCredentials> {
        self.credentials_for(DIALOG_SERVICE_LABEL)
            .and_then(|c| serde_json::from_value(c.clone()).ok())
    }

    pub fn iot_credentials(&self) -> Option<IotCredentials> {
        self.credentials_for(IOT_SERVICE_LABEL)
            .and_then(|c| serde_json::from_value(c.clone()).ok())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Port handed out by the hosting platform, if any.
pub fn platform_port(lookup: &impl Fn(&str) -> Option<String>) -> Option<u16> {
    ["VCAP_APP_PORT", "PORT"]
        .into_iter()
        .filter_map(|key| lookup(key))
        .find_map(|value| value.trim().parse::<u16>().ok())
}
