//! Request and response bodies for `POST /conversation`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{ConversationTurn, DialogRef, DialogResponse};

/// Body of a conversation turn.
///
/// `input` may be omitted to start a new conversation. Fields other than the
/// session ids are profile values and are forwarded to the dialog engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationRequest {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub client_id: Option<DialogRef>,
    #[serde(default)]
    pub conversation_id: Option<DialogRef>,
    #[serde(flatten)]
    pub profile_values: Map<String, Value>,
}

impl From<ConversationRequest> for ConversationTurn {
    fn from(req: ConversationRequest) -> Self {
        ConversationTurn {
            client_id: req.client_id,
            conversation_id: req.conversation_id,
            input: req.input,
            profile_values: req.profile_values,
        }
    }
}

/// Response of a conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationReply {
    pub dialog_id: String,
    pub conversation: DialogResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extra_fields_become_profile_values() {
        let req: ConversationRequest = serde_json::from_value(json!({
            "input": "hello",
            "client_id": 7,
            "conversation_id": "11",
            "name": "Ada"
        }))
        .unwrap();

        let turn = ConversationTurn::from(req);

        assert_eq!(turn.input, "hello");
        assert_eq!(turn.client_id, Some(DialogRef::Number(7)));
        assert_eq!(turn.conversation_id, Some(DialogRef::Text("11".to_string())));
        assert_eq!(turn.profile_values.len(), 1);
        assert_eq!(turn.profile_values["name"], json!("Ada"));
    }

    #[test]
    fn empty_body_starts_a_conversation() {
        let req: ConversationRequest = serde_json::from_value(json!({})).unwrap();
        let turn = ConversationTurn::from(req);

        assert!(turn.input.is_empty());
        assert!(turn.client_id.is_none());
        assert!(turn.conversation_id.is_none());
    }

    #[test]
    fn reply_wraps_dialog_response() {
        let reply = ConversationReply {
            dialog_id: "dlg-1".to_string(),
            conversation: DialogResponse::from_segments(["Hi"]),
        };
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            json!({"dialog_id": "dlg-1", "conversation": {"response": ["Hi"]}})
        );
    }
}
