//! Telemetry events and the sensor readings decoded from them.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Key under which devices nest their datapoints in the wrapped payload shape.
const WRAPPED_PAYLOAD_KEY: &str = "d";

/// A cached device event as returned by the IoT platform.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelemetrySample {
    pub type_id: String,
    pub device_id: String,
    pub event_id: String,
    pub format: String,
    /// Base64-encoded event body.
    pub payload: String,
    pub timestamp: Option<String>,
}

impl TelemetrySample {
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            ..Default::default()
        }
    }
}

/// Why a reading could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadingFailure {
    NoEvents,
    NotBase64,
    NotJson,
    MissingDatapoint,
    TelemetryUnavailable,
}

/// The value reported to the dialog engine for one datapoint.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorReading {
    Value(Value),
    Unavailable(ReadingFailure),
}

impl SensorReading {
    /// Text sent to the dialog in place of a value that could not be read.
    pub const UNAVAILABLE_TEXT: &'static str = "NO";

    /// Reads `datapoint` from the most recent event, if any.
    pub fn from_samples(samples: &[TelemetrySample], datapoint: &str) -> Self {
        match samples.first() {
            Some(sample) => Self::from_payload(&sample.payload, datapoint),
            None => SensorReading::Unavailable(ReadingFailure::NoEvents),
        }
    }

    /// Decodes a base64 JSON payload and reads `datapoint` from either
    /// `{"<datapoint>": v}` or `{"d": {"<datapoint>": v}}`.
    pub fn from_payload(encoded: &str, datapoint: &str) -> Self {
        let bytes = match STANDARD.decode(encoded.trim()) {
            Ok(bytes) => bytes,
            Err(_) => return SensorReading::Unavailable(ReadingFailure::NotBase64),
        };
        let body: Value = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(_) => return SensorReading::Unavailable(ReadingFailure::NotJson),
        };

        let flat = body.get(datapoint);
        let wrapped = body
            .get(WRAPPED_PAYLOAD_KEY)
            .and_then(|inner| inner.get(datapoint));

        match flat.filter(|v| !v.is_null()).or(wrapped.filter(|v| !v.is_null())) {
            Some(value) => SensorReading::Value(value.clone()),
            None => SensorReading::Unavailable(ReadingFailure::MissingDatapoint),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SensorReading::Value(_))
    }

    /// Numeric view of the reading, when it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SensorReading::Value(Value::Number(n)) => n.as_f64(),
            SensorReading::Value(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for SensorReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorReading::Value(Value::String(s)) => f.write_str(s),
            SensorReading::Value(other) => write!(f, "{other}"),
            SensorReading::Unavailable(_) => f.write_str(Self::UNAVAILABLE_TEXT),
        }
    }
}
