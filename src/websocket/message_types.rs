use crate::models::UserProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inbound WebSocket events from client to server
///
/// Anything that does not parse into one of these variants (unknown `type`,
/// non-object payload, malformed JSON) takes the fallback path in the
/// session actor and is answered with [`FALLBACK_ACK`].
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WsInboundEvent {
    #[serde(rename = "authenticate")]
    Authenticate { token: String },

    #[serde(rename = "privateMessage", rename_all = "camelCase")]
    PrivateMessage {
        sender_id: Uuid,
        receiver_id: Uuid,
        content: String,
        /// Client-supplied; relayed and persisted verbatim.
        timestamp: DateTime<Utc>,
    },
}

/// Outbound WebSocket events from server to client
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WsOutboundEvent {
    #[serde(rename = "authenticated")]
    Authenticated { message: String },

    #[serde(rename = "error")]
    Error { message: String },

    #[serde(rename = "connectedUsers")]
    ConnectedUsers { users: Vec<UserProfile> },

    #[serde(rename = "privateMessage")]
    PrivateMessage {
        from: Uuid,
        to: Uuid,
        content: String,
        timestamp: DateTime<Utc>,
    },
}

impl WsOutboundEvent {
    /// JSON wire form for broadcast / channel delivery.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Raw acknowledgment for inbound frames outside the envelope schema.
/// Deliberately not JSON: existing clients expect a plain string here.
pub const FALLBACK_ACK: &str = "message received by server";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_authenticate_frame() {
        let evt: WsInboundEvent =
            serde_json::from_str(r#"{"type":"authenticate","token":"abc.def.ghi"}"#).unwrap();
        assert!(matches!(evt, WsInboundEvent::Authenticate { token } if token == "abc.def.ghi"));
    }

    #[test]
    fn parses_private_message_with_camel_case_fields() {
        let sender = Uuid::new_v4();
        let receiver = Uuid::new_v4();
        let raw = format!(
            r#"{{"type":"privateMessage","senderId":"{sender}","receiverId":"{receiver}","content":"hi","timestamp":"2024-05-01T12:00:00Z"}}"#
        );
        let evt: WsInboundEvent = serde_json::from_str(&raw).unwrap();
        match evt {
            WsInboundEvent::PrivateMessage {
                sender_id,
                receiver_id,
                content,
                ..
            } => {
                assert_eq!(sender_id, sender);
                assert_eq!(receiver_id, receiver);
                assert_eq!(content, "hi");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn unknown_type_does_not_parse() {
        assert!(serde_json::from_str::<WsInboundEvent>(r#"{"type":"ping"}"#).is_err());
        assert!(serde_json::from_str::<WsInboundEvent>(r#""just a string""#).is_err());
    }

    #[test]
    fn connected_users_carries_type_tag() {
        let event = WsOutboundEvent::ConnectedUsers { users: vec![] };
        let json = event.to_json().unwrap();
        assert_eq!(json, r#"{"type":"connectedUsers","users":[]}"#);
    }

    #[test]
    fn outbound_private_message_uses_from_to_fields() {
        let event = WsOutboundEvent::PrivateMessage {
            from: Uuid::nil(),
            to: Uuid::nil(),
            content: "hi".into(),
            timestamp: "2024-05-01T12:00:00Z".parse().unwrap(),
        };
        let json = event.to_json().unwrap();
        assert!(json.contains(r#""type":"privateMessage""#));
        assert!(json.contains(r#""from":"#));
        assert!(json.contains(r#""to":"#));
    }
}
