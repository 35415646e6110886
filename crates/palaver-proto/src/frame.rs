//! Frame types and their JSON encoding.
//!
//! The server's wire vocabulary is small: a backlog snapshot
//! (`message_history`) delivered once after connect, single live events
//! (`chat_message`) after that, and whatever tags future servers add. The
//! [`Inbound`] classifier maps that vocabulary onto an enum so the session
//! state machine can match exhaustively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// One chat message as it appears on the wire.
///
/// Field names follow the server's JSON keys (`username`, `message`,
/// `timestamp`); the Rust names say what the fields mean. The timestamp is
/// the sender's wall-clock stamp, RFC 3339 encoded. It is display-only and
/// never an ordering authority: log order is arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Username of the author.
    #[serde(rename = "username")]
    pub sender: String,

    /// Message text.
    #[serde(rename = "message")]
    pub body: String,

    /// Wall-clock stamp captured by the sender.
    #[serde(rename = "timestamp")]
    pub sent_at: DateTime<Utc>,
}

/// A classified inbound frame.
///
/// Classification is by the `type` tag alone. Tags we do not recognize decode
/// to [`Inbound::Unknown`] so the stream survives server protocol extensions;
/// a recognized tag with a payload that does not match its shape is a
/// [`ProtocolError`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Backlog snapshot: the full history for the channel, in server order.
    MessageHistory {
        /// Historical messages, oldest first.
        messages: Vec<MessageRecord>,
    },

    /// One live message.
    ChatMessage(MessageRecord),

    /// A frame with a tag this client does not understand.
    Unknown {
        /// The unrecognized `type` value.
        tag: String,
    },
}

impl Inbound {
    /// Decode one inbound text frame.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::Malformed`] if the text is not JSON or a recognized
    ///   tag's payload does not match its shape
    /// - [`ProtocolError::MissingTag`] if there is no `type` field
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        #[derive(Deserialize)]
        struct Tagged {
            #[serde(rename = "type")]
            tag: Option<String>,
        }

        let Tagged { tag } =
            serde_json::from_str(text).map_err(|e| ProtocolError::malformed(&e))?;

        let Some(tag) = tag else {
            return Err(ProtocolError::MissingTag);
        };

        match tag.as_str() {
            "message_history" => {
                #[derive(Deserialize)]
                struct History {
                    messages: Vec<MessageRecord>,
                }

                let History { messages } =
                    serde_json::from_str(text).map_err(|e| ProtocolError::malformed(&e))?;

                Ok(Self::MessageHistory { messages })
            },
            "chat_message" => {
                let record: MessageRecord =
                    serde_json::from_str(text).map_err(|e| ProtocolError::malformed(&e))?;

                Ok(Self::ChatMessage(record))
            },
            _ => Ok(Self::Unknown { tag }),
        }
    }
}

/// An outbound message frame.
///
/// Sent only while the connection is established. Carries the author's
/// identity and a send-time stamp; the server echoes the message back through
/// the live-event path, which is where it enters the local log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outbound {
    /// Message text.
    #[serde(rename = "message")]
    pub body: String,

    /// Username of the author.
    #[serde(rename = "username")]
    pub sender: String,

    /// Wall-clock stamp captured at send time.
    #[serde(rename = "timestamp")]
    pub sent_at: DateTime<Utc>,
}

impl Outbound {
    /// Encode this frame as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode { reason: e.to_string() })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decode_message_history() {
        let text = r#"{
            "type": "message_history",
            "messages": [
                {"username": "alice", "message": "hi", "timestamp": "2024-03-01T12:00:00+00:00"},
                {"username": "bob", "message": "yo", "timestamp": "2024-03-01T12:00:05+00:00"}
            ]
        }"#;

        let frame = Inbound::decode(text).unwrap();
        match frame {
            Inbound::MessageHistory { messages } => {
                assert_eq!(messages.len(), 2);
                assert_eq!(messages[0].sender, "alice");
                assert_eq!(messages[0].body, "hi");
                assert_eq!(messages[1].sender, "bob");
            },
            other => panic!("expected MessageHistory, got {other:?}"),
        }
    }

    #[test]
    fn decode_empty_history() {
        let text = r#"{"type": "message_history", "messages": []}"#;

        let frame = Inbound::decode(text).unwrap();
        assert_eq!(frame, Inbound::MessageHistory { messages: vec![] });
    }

    #[test]
    fn decode_chat_message() {
        let text = r#"{
            "type": "chat_message",
            "username": "bob",
            "message": "hello there",
            "timestamp": "2024-03-01T12:00:00Z"
        }"#;

        let frame = Inbound::decode(text).unwrap();
        match frame {
            Inbound::ChatMessage(record) => {
                assert_eq!(record.sender, "bob");
                assert_eq!(record.body, "hello there");
            },
            other => panic!("expected ChatMessage, got {other:?}"),
        }
    }

    #[test]
    fn decode_ignores_extra_fields() {
        // The direct-message path attaches an is_dm flag we don't model.
        let text = r#"{
            "type": "chat_message",
            "username": "bob",
            "message": "psst",
            "timestamp": "2024-03-01T12:00:00Z",
            "is_dm": true
        }"#;

        assert!(matches!(Inbound::decode(text), Ok(Inbound::ChatMessage(_))));
    }

    #[test]
    fn unrecognized_tag_classifies_as_unknown() {
        let text = r#"{"type": "typing_indicator", "username": "alice"}"#;

        let frame = Inbound::decode(text).unwrap();
        assert_eq!(frame, Inbound::Unknown { tag: "typing_indicator".to_string() });
    }

    #[test]
    fn missing_tag_is_an_error() {
        let text = r#"{"username": "alice", "message": "hi"}"#;

        assert_eq!(Inbound::decode(text), Err(ProtocolError::MissingTag));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(Inbound::decode("{not json"), Err(ProtocolError::Malformed { .. })));
    }

    #[test]
    fn known_tag_with_wrong_payload_is_an_error() {
        // Tag says history but the payload has no messages array.
        let text = r#"{"type": "message_history", "username": "alice"}"#;

        assert!(matches!(Inbound::decode(text), Err(ProtocolError::Malformed { .. })));
    }

    #[test]
    fn bad_timestamp_is_an_error() {
        // The server's fallback path can emit an empty timestamp; that frame
        // is dropped rather than invented.
        let text = r#"{
            "type": "chat_message",
            "username": "bob",
            "message": "hi",
            "timestamp": ""
        }"#;

        assert!(matches!(Inbound::decode(text), Err(ProtocolError::Malformed { .. })));
    }

    #[test]
    fn encode_outbound_uses_wire_keys() {
        let frame = Outbound {
            body: "hello".to_string(),
            sender: "carol".to_string(),
            sent_at: "2024-03-01T12:00:00Z".parse().unwrap(),
        };

        let text = frame.encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["message"], "hello");
        assert_eq!(value["username"], "carol");
        assert_eq!(value["timestamp"], "2024-03-01T12:00:00Z");
    }
}
