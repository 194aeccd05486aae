//! HandleConversation command handler.
//!
//! Forwards one user turn to the dialog engine and, depending on what the
//! scripted reply asks for, performs at most one telemetry round trip:
//!
//! 1. Device-list phrase: list the registry, refresh the shared directory and
//!    reply with the original text followed by every device label.
//! 2. Value marker: resolve the device named before the first comma, read the
//!    configured datapoint from its latest event, store it in the dialog
//!    profile and let the dialog phrase it.
//! 3. Anything else: reply unchanged.
//!
//! Dialog failures fail the turn. Telemetry failures never do; they degrade
//! into a notice or the "NO" reading.

use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::ConversationConfig;
use crate::domain::{
    ComfortAdvisory, ConversationTurn, DeviceDirectory, DialogIntent, DialogResponse,
    IntentMatcher, ProfileUpdate, ProfileValue, ReadingFailure, SensorReading,
};
use crate::ports::{DialogError, DialogService, TelemetryService};

use super::device_cache::SharedDeviceDirectory;

/// Appended when the device registry cannot be listed.
pub const REGISTRY_UNAVAILABLE_NOTICE: &str = "bind the telemetry service to get the list of rooms";

/// Errors that fail a conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    /// The dialog engine failed.
    #[error("Dialog service error: {0}")]
    Dialog(#[from] DialogError),
}

/// Which branch a turn took.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationRoute {
    /// Dialog reply passed through untouched.
    Reply,
    /// Device labels appended to the reply.
    DeviceList { devices: usize },
    /// Registry could not be listed; notice appended.
    RegistryUnavailable,
    /// Named device is not in the directory; "no device" reply returned.
    UnknownDevice { device_name: String },
    /// Reading stored in the profile; phrased reply returned.
    SensorReading {
        device_name: String,
        reading: SensorReading,
    },
}

/// Result of a conversation turn.
#[derive(Debug, Clone)]
pub struct ConversationOutcome {
    /// Reply to hand back to the caller.
    pub conversation: DialogResponse,
    /// Branch taken.
    pub route: ConversationRoute,
}

/// Matching rules and dialog vocabulary used by the handler.
#[derive(Debug, Clone)]
pub struct ConversationSettings {
    pub matcher: IntentMatcher,
    pub device_label_key: String,
    pub datapoint: String,
    pub profile_variable: String,
    pub sensor_value_input: String,
    pub no_device_input: String,
    pub advisory: Option<ComfortAdvisory>,
}

impl From<&ConversationConfig> for ConversationSettings {
    fn from(config: &ConversationConfig) -> Self {
        Self {
            matcher: IntentMatcher::new(
                config.device_list_triggers.iter().cloned(),
                config.value_marker.clone(),
            ),
            device_label_key: config.device_label_key.clone(),
            datapoint: config.datapoint.clone(),
            profile_variable: config.profile_variable.clone(),
            sensor_value_input: config.sensor_value_input.clone(),
            no_device_input: config.no_device_input.clone(),
            advisory: config
                .comfort_advisory
                .enabled
                .then(|| ComfortAdvisory::new(config.comfort_advisory.min, config.comfort_advisory.max)),
        }
    }
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self::from(&ConversationConfig::default())
    }
}

/// Handler for conversation turns.
pub struct HandleConversationHandler {
    dialog: Arc<dyn DialogService>,
    telemetry: Arc<dyn TelemetryService>,
    devices: SharedDeviceDirectory,
    settings: ConversationSettings,
}

impl HandleConversationHandler {
    pub fn new(
        dialog: Arc<dyn DialogService>,
        telemetry: Arc<dyn TelemetryService>,
        devices: SharedDeviceDirectory,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            dialog,
            telemetry,
            devices,
            settings,
        }
    }

    /// Dialog the turns are sent to.
    pub fn dialog_id(&self) -> &str {
        self.dialog.dialog_id()
    }

    /// Runs one conversation turn.
    pub async fn handle(
        &self,
        turn: ConversationTurn,
    ) -> Result<ConversationOutcome, ConversationError> {
        let span = tracing::info_span!(
            "conversation_turn",
            trace_id = %Uuid::new_v4(),
            client_id = %turn.client_id.as_ref().map(ToString::to_string).unwrap_or_default(),
        );
        self.run(turn).instrument(span).await
    }

    async fn run(&self, turn: ConversationTurn) -> Result<ConversationOutcome, ConversationError> {
        let reply = self.dialog.converse(&turn).await?;
        let text = reply.text();

        let outcome = match self.settings.matcher.classify(&text) {
            DialogIntent::ListDevices => self.list_devices(reply, text).await,
            DialogIntent::ReadSensor { device_name } => {
                self.read_sensor(&turn, device_name).await?
            }
            DialogIntent::Reply => ConversationOutcome {
                conversation: reply,
                route: ConversationRoute::Reply,
            },
        };

        tracing::info!(route = ?outcome.route, "Conversation turn complete");
        Ok(outcome)
    }

    async fn list_devices(&self, mut reply: DialogResponse, text: String) -> ConversationOutcome {
        match self.telemetry.list_devices().await {
            Ok(devices) => {
                let directory =
                    DeviceDirectory::from_registry(devices, &self.settings.device_label_key);
                let labels = directory.labels().to_vec();
                self.devices.replace(directory).await;

                tracing::debug!(devices = labels.len(), "Device directory refreshed");
                reply.response = std::iter::once(text).chain(labels.iter().cloned()).collect();
                ConversationOutcome {
                    conversation: reply,
                    route: ConversationRoute::DeviceList {
                        devices: labels.len(),
                    },
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Device registry unavailable");
                reply.response.push(String::new());
                reply.response.push(REGISTRY_UNAVAILABLE_NOTICE.to_string());
                ConversationOutcome {
                    conversation: reply,
                    route: ConversationRoute::RegistryUnavailable,
                }
            }
        }
    }

    async fn read_sensor(
        &self,
        turn: &ConversationTurn,
        device_name: String,
    ) -> Result<ConversationOutcome, ConversationError> {
        let Some(device) = self.devices.lookup(&device_name).await else {
            tracing::info!(device = %device_name, "Unknown device requested");
            let reply = self
                .dialog
                .converse(&turn.with_input(self.settings.no_device_input.as_str()))
                .await?;
            return Ok(ConversationOutcome {
                conversation: reply,
                route: ConversationRoute::UnknownDevice { device_name },
            });
        };

        let reading = match self
            .telemetry
            .last_events(&device.type_id, &device.device_id)
            .await
        {
            Ok(samples) => SensorReading::from_samples(&samples, &self.settings.datapoint),
            Err(e) => {
                tracing::warn!(
                    device = %device_name,
                    device_id = %device.device_id,
                    error = %e,
                    "Last event lookup failed"
                );
                SensorReading::Unavailable(ReadingFailure::TelemetryUnavailable)
            }
        };
        if let SensorReading::Unavailable(ref why) = reading {
            tracing::warn!(device = %device_name, reason = ?why, "No usable reading");
        }

        let update = ProfileUpdate {
            client_id: turn.client_id.clone(),
            name_values: vec![ProfileValue::new(
                self.settings.profile_variable.as_str(),
                reading.to_string(),
            )],
        };
        self.dialog.update_profile(&update).await?;

        let mut reply = self
            .dialog
            .converse(&turn.with_input(self.settings.sensor_value_input.as_str()))
            .await?;

        if let (Some(advisory), Some(value)) = (self.settings.advisory, reading.as_f64()) {
            if let Some(first) = reply.response.first_mut() {
                first.push_str(advisory.advise(value));
            }
        }

        Ok(ConversationOutcome {
            conversation: reply,
            route: ConversationRoute::SensorReading {
                device_name,
                reading,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::dialog::MockDialogService;
    use crate::adapters::telemetry::{MockTelemetryService, TelemetryCall};
    use crate::domain::{DeviceRegistryEntry, DialogRef, TelemetrySample};
    use crate::ports::TelemetryError;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde_json::json;

    const LIST_INPUT: &str = "where are the offices";
    const VALUE_INPUT: &str = "temperature in 101";

    fn office(device_id: &str, office: &str) -> DeviceRegistryEntry {
        DeviceRegistryEntry::new("tempSensor", device_id).with_metadata("Office Number", office)
    }

    fn event(body: &str) -> TelemetrySample {
        TelemetrySample::with_payload(STANDARD.encode(body))
    }

    fn turn(input: &str) -> ConversationTurn {
        ConversationTurn::new(input).with_session(DialogRef::from(7), DialogRef::from(11))
    }

    fn base_dialog() -> MockDialogService {
        MockDialogService::new("dlg-1")
            .with_reply(LIST_INPUT, ["here are the list of offices"])
            .with_reply(VALUE_INPUT, ["101, the temperature is VALUE"])
            .with_reply("DISPLAY NO DEVICE", ["Sorry, I do not know that office."])
            .with_reply("DISPLAY SENSOR VALUE", ["It is 21 degrees in 101."])
    }

    fn handler(
        dialog: &MockDialogService,
        telemetry: &MockTelemetryService,
        devices: SharedDeviceDirectory,
        settings: ConversationSettings,
    ) -> HandleConversationHandler {
        HandleConversationHandler::new(
            Arc::new(dialog.clone()),
            Arc::new(telemetry.clone()),
            devices,
            settings,
        )
    }

    async fn known_offices(devices: &[DeviceRegistryEntry]) -> SharedDeviceDirectory {
        let shared = SharedDeviceDirectory::new();
        shared
            .replace(DeviceDirectory::from_registry(
                devices.to_vec(),
                "Office Number",
            ))
            .await;
        shared
    }

    #[tokio::test]
    async fn plain_reply_passes_through() {
        let dialog = MockDialogService::new("dlg-1").with_reply("hello", ["Hi! How can I help?"]);
        let telemetry = MockTelemetryService::new();
        let h = handler(&dialog, &telemetry, SharedDeviceDirectory::new(), Default::default());

        let outcome = h.handle(turn("hello")).await.unwrap();

        assert_eq!(outcome.route, ConversationRoute::Reply);
        assert_eq!(outcome.conversation.response, vec!["Hi! How can I help?".to_string()]);
        assert!(telemetry.calls().is_empty());
        assert_eq!(h.dialog_id(), "dlg-1");
    }

    #[tokio::test]
    async fn device_list_appends_labels_in_registry_order() {
        let dialog = base_dialog();
        let telemetry = MockTelemetryService::new().with_devices(vec![
            office("d1", "301"),
            DeviceRegistryEntry::new("tempSensor", "lobby-sensor"),
            office("d3", "101"),
        ]);
        let devices = SharedDeviceDirectory::new();
        let h = handler(&dialog, &telemetry, devices.clone(), Default::default());

        let outcome = h.handle(turn(LIST_INPUT)).await.unwrap();

        assert_eq!(
            outcome.conversation.response,
            vec!["here are the list of offices", "301", "lobby-sensor", "101"]
        );
        assert_eq!(outcome.route, ConversationRoute::DeviceList { devices: 3 });
        assert_eq!(devices.lookup("101").await.unwrap().device_id, "d3");
    }

    #[tokio::test]
    async fn device_list_joins_multi_segment_text() {
        let dialog = MockDialogService::new("dlg-1").with_reply(
            "where is Ada",
            ["Ada", "could be in one of the following office(s)"],
        );
        let telemetry = MockTelemetryService::new().with_devices(vec![office("d1", "101")]);
        let h = handler(&dialog, &telemetry, SharedDeviceDirectory::new(), Default::default());

        let outcome = h.handle(turn("where is Ada")).await.unwrap();

        assert_eq!(
            outcome.conversation.response,
            vec!["Ada could be in one of the following office(s)", "101"]
        );
    }

    #[tokio::test]
    async fn registry_failure_appends_notice() {
        let dialog = base_dialog();
        let telemetry =
            MockTelemetryService::new().with_registry_error(TelemetryError::NotProvisioned);
        let devices = known_offices(&[office("d1", "101")]).await;
        let h = handler(&dialog, &telemetry, devices.clone(), Default::default());

        let outcome = h.handle(turn(LIST_INPUT)).await.unwrap();

        assert_eq!(
            outcome.conversation.response,
            vec!["here are the list of offices", "", REGISTRY_UNAVAILABLE_NOTICE]
        );
        assert_eq!(outcome.route, ConversationRoute::RegistryUnavailable);
        assert_eq!(
            outcome.conversation.response[2],
            "bind the telemetry service to get the list of rooms"
        );
        // A failed listing leaves the previous directory in place.
        assert!(devices.lookup("101").await.is_some());
    }

    #[tokio::test]
    async fn unknown_device_asks_dialog_for_no_device_reply() {
        let dialog = base_dialog();
        let telemetry = MockTelemetryService::new();
        let h = handler(&dialog, &telemetry, SharedDeviceDirectory::new(), Default::default());

        let outcome = h.handle(turn(VALUE_INPUT)).await.unwrap();

        assert_eq!(
            outcome.conversation.response,
            vec!["Sorry, I do not know that office."]
        );
        assert_eq!(
            outcome.route,
            ConversationRoute::UnknownDevice {
                device_name: "101".to_string()
            }
        );
        assert!(telemetry.calls().is_empty());
        assert!(dialog.profile_updates().is_empty());
        assert_eq!(dialog.inputs(), vec![VALUE_INPUT, "DISPLAY NO DEVICE"]);

        // The sentinel turn keeps the caller's session.
        let sentinel = &dialog.turns()[1];
        assert_eq!(sentinel.client_id, Some(DialogRef::from(7)));
        assert_eq!(sentinel.conversation_id, Some(DialogRef::from(11)));
    }

    #[tokio::test]
    async fn known_device_reading_is_stored_and_phrased() {
        let dialog = base_dialog();
        let telemetry = MockTelemetryService::new().with_events(
            "tempSensor",
            "d1",
            vec![event(r#"{"temperature": 21}"#)],
        );
        let devices = known_offices(&[office("d1", "101")]).await;
        let h = handler(&dialog, &telemetry, devices, Default::default());

        let outcome = h.handle(turn(VALUE_INPUT)).await.unwrap();

        assert_eq!(outcome.conversation.response, vec!["It is 21 degrees in 101."]);
        assert_eq!(
            outcome.route,
            ConversationRoute::SensorReading {
                device_name: "101".to_string(),
                reading: SensorReading::Value(json!(21)),
            }
        );
        assert_eq!(
            telemetry.calls(),
            vec![TelemetryCall::LastEvents {
                type_id: "tempSensor".to_string(),
                device_id: "d1".to_string(),
            }]
        );
        assert_eq!(
            dialog.profile_updates(),
            vec![ProfileUpdate {
                client_id: Some(DialogRef::from(7)),
                name_values: vec![ProfileValue::new("value", "21")],
            }]
        );
        assert_eq!(dialog.inputs(), vec![VALUE_INPUT, "DISPLAY SENSOR VALUE"]);
    }

    #[tokio::test]
    async fn wrapped_payload_is_read() {
        let dialog = base_dialog();
        let telemetry = MockTelemetryService::new().with_events(
            "tempSensor",
            "d1",
            vec![event(r#"{"d": {"temperature": 21}}"#)],
        );
        let devices = known_offices(&[office("d1", "101")]).await;
        let h = handler(&dialog, &telemetry, devices, Default::default());

        h.handle(turn(VALUE_INPUT)).await.unwrap();

        assert_eq!(dialog.profile_updates()[0].name_values[0].value, "21");
    }

    #[tokio::test]
    async fn label_with_spaces_matches_untrimmed_name() {
        let dialog = MockDialogService::new("dlg-1")
            .with_reply("how warm is suite 5", ["Suite 5 , the temperature is VALUE"])
            .with_reply("DISPLAY SENSOR VALUE", ["It is 20 degrees in Suite 5."]);
        let telemetry = MockTelemetryService::new().with_events(
            "tempSensor",
            "s5",
            vec![event(r#"{"temperature": 20}"#)],
        );
        let devices = known_offices(&[office("s5", "Suite 5 ")]).await;
        let h = handler(&dialog, &telemetry, devices, Default::default());

        let outcome = h.handle(turn("how warm is suite 5")).await.unwrap();

        assert_eq!(
            outcome.route,
            ConversationRoute::SensorReading {
                device_name: "Suite 5 ".to_string(),
                reading: SensorReading::Value(json!(20)),
            }
        );
    }

    #[tokio::test]
    async fn unreadable_payload_stores_no() {
        let dialog = base_dialog();
        let telemetry = MockTelemetryService::new().with_events(
            "tempSensor",
            "d1",
            vec![event(r#"{"humidity": 40}"#)],
        );
        let devices = known_offices(&[office("d1", "101")]).await;
        let h = handler(&dialog, &telemetry, devices, Default::default());

        let outcome = h.handle(turn(VALUE_INPUT)).await.unwrap();

        assert_eq!(dialog.profile_updates()[0].name_values[0].value, "NO");
        assert!(matches!(
            outcome.route,
            ConversationRoute::SensorReading {
                reading: SensorReading::Unavailable(ReadingFailure::MissingDatapoint),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn event_lookup_failure_stores_no() {
        let dialog = base_dialog();
        let telemetry = MockTelemetryService::new().with_events_error(
            "tempSensor",
            "d1",
            TelemetryError::network("connection reset"),
        );
        let devices = known_offices(&[office("d1", "101")]).await;
        let h = handler(&dialog, &telemetry, devices, Default::default());

        let outcome = h.handle(turn(VALUE_INPUT)).await.unwrap();

        assert_eq!(dialog.profile_updates()[0].name_values[0].value, "NO");
        assert_eq!(outcome.conversation.response, vec!["It is 21 degrees in 101."]);
    }

    #[tokio::test]
    async fn initial_dialog_failure_propagates() {
        let dialog = MockDialogService::new("dlg-1")
            .with_error("hello", DialogError::rejected(500, "dialog engine down"));
        let telemetry = MockTelemetryService::new();
        let h = handler(&dialog, &telemetry, SharedDeviceDirectory::new(), Default::default());

        let err = h.handle(turn("hello")).await.unwrap_err();

        assert_eq!(
            err,
            ConversationError::Dialog(DialogError::rejected(500, "dialog engine down"))
        );
    }

    #[tokio::test]
    async fn profile_update_failure_propagates() {
        let dialog = base_dialog().with_profile_error(DialogError::AuthenticationFailed);
        let telemetry = MockTelemetryService::new().with_events(
            "tempSensor",
            "d1",
            vec![event(r#"{"temperature": 21}"#)],
        );
        let devices = known_offices(&[office("d1", "101")]).await;
        let h = handler(&dialog, &telemetry, devices, Default::default());

        let err = h.handle(turn(VALUE_INPUT)).await.unwrap_err();

        assert_eq!(err, ConversationError::Dialog(DialogError::AuthenticationFailed));
        assert_eq!(dialog.inputs(), vec![VALUE_INPUT]);
    }

    #[tokio::test]
    async fn sentinel_dialog_failure_propagates() {
        let dialog = base_dialog().with_error("DISPLAY NO DEVICE", DialogError::network("reset"));
        let telemetry = MockTelemetryService::new();
        let h = handler(&dialog, &telemetry, SharedDeviceDirectory::new(), Default::default());

        let err = h.handle(turn(VALUE_INPUT)).await.unwrap_err();

        assert_eq!(err, ConversationError::Dialog(DialogError::network("reset")));
    }

    #[tokio::test]
    async fn listing_then_reading_across_turns() {
        let dialog = base_dialog();
        let telemetry = MockTelemetryService::new()
            .with_devices(vec![office("d1", "101")])
            .with_events("tempSensor", "d1", vec![event(r#"{"temperature": 23.5}"#)]);
        let h = handler(&dialog, &telemetry, SharedDeviceDirectory::new(), Default::default());

        h.handle(turn(LIST_INPUT)).await.unwrap();
        h.handle(turn(VALUE_INPUT)).await.unwrap();

        assert_eq!(telemetry.calls().len(), 2);
        assert_eq!(dialog.profile_updates()[0].name_values[0].value, "23.5");
    }

    #[tokio::test]
    async fn comfort_advisory_is_appended_when_enabled() {
        let dialog = base_dialog();
        let telemetry = MockTelemetryService::new().with_events(
            "tempSensor",
            "d1",
            vec![event(r#"{"temperature": 30}"#)],
        );
        let devices = known_offices(&[office("d1", "101")]).await;
        let settings = ConversationSettings {
            advisory: Some(ComfortAdvisory::new(19.0, 25.0)),
            ..Default::default()
        };
        let h = handler(&dialog, &telemetry, devices, settings);

        let outcome = h.handle(turn(VALUE_INPUT)).await.unwrap();

        let first = &outcome.conversation.response[0];
        assert!(first.starts_with("It is 21 degrees in 101."));
        assert!(first.contains("air conditioning"));
    }

    #[tokio::test]
    async fn configured_vocabulary_is_used() {
        let config = ConversationConfig {
            device_list_triggers: vec!["rooms with sensors".to_string()],
            value_marker: "READING".to_string(),
            datapoint: "humidity".to_string(),
            profile_variable: "reading".to_string(),
            sensor_value_input: "SHOW READING".to_string(),
            ..Default::default()
        };
        let dialog = MockDialogService::new("dlg-1")
            .with_reply("humidity in lab", ["lab, humidity READING"])
            .with_reply("SHOW READING", ["Humidity in the lab is 40%."]);
        let telemetry = MockTelemetryService::new().with_events(
            "hygro",
            "h1",
            vec![event(r#"{"d": {"humidity": 40}}"#)],
        );
        let devices = SharedDeviceDirectory::new();
        devices
            .replace(DeviceDirectory::from_registry(
                vec![DeviceRegistryEntry::new("hygro", "h1").with_metadata("Office Number", "lab")],
                "Office Number",
            ))
            .await;
        let h = handler(&dialog, &telemetry, devices, ConversationSettings::from(&config));

        let outcome = h.handle(turn("humidity in lab")).await.unwrap();

        assert_eq!(outcome.conversation.response, vec!["Humidity in the lab is 40%."]);
        assert_eq!(
            dialog.profile_updates()[0].name_values,
            vec![ProfileValue::new("reading", "40")]
        );
    }
}
