//! # Message Protocol
//!
//! Payloads exchanged with upload clients over HTTP and WebSocket.
//!
//! All payloads are JSON. Inbound images arrive either as a base64 string
//! (optionally behind a `data:<mime>;base64,` prefix) or as raw bytes; the
//! reply is always a [`CommandEnvelope`] or an [`ErrorResponse`].

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ============================================================================
// INBOUND
// ============================================================================

/// An image received on any transport, after its bytes have been extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Optional client-supplied tag, echoed back in the acknowledgment
    pub label: Option<String>,
    /// Raw image bytes
    pub image: Vec<u8>,
}

impl UploadRequest {
    pub fn new(label: Option<String>, image: Vec<u8>) -> Self {
        Self { label, image }
    }

    /// The label, treating an empty string the same as no label at all.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.is_empty())
    }
}

/// JSON body accepted by `POST /uploadBase64`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Base64Upload {
    #[serde(default)]
    pub label: Option<String>,
    /// `data:image/jpeg;base64,...` or plain base64
    pub image: String,
}

/// A text frame received on `/ws`.
///
/// Only two shapes exist: a well-formed upload, or some other JSON object.
/// Anything that is not a JSON object fails to deserialize altogether.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClientFrame {
    /// `{"label"?: any, "image": string}`; a label that is not a string is dropped
    Upload {
        #[serde(default, deserialize_with = "string_or_none")]
        label: Option<String>,
        image: String,
    },
    /// Any other object, e.g. `{"image": 123}`
    Other(serde_json::Map<String, serde_json::Value>),
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(label) => Ok(Some(label)),
        _ => Ok(None),
    }
}

/// Which entry point an upload came through. Used for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Base64Json,
    Multipart,
    WebSocketText,
    WebSocketBinary,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Transport::Base64Json => "base64-json",
            Transport::Multipart => "multipart",
            Transport::WebSocketText => "ws-text",
            Transport::WebSocketBinary => "ws-binary",
        };
        f.write_str(name)
    }
}

// ============================================================================
// OUTBOUND
// ============================================================================

/// Acknowledgment command sent back for every accepted image.
///
/// `labelReceived` is omitted from the JSON entirely when there is no label;
/// existing clients test for the key, not for null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckCommand {
    pub action: String,
    #[serde(
        rename = "labelReceived",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub label_received: Option<String>,
}

/// Response wrapper: the command plus the UTC time it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub command: AckCommand,
    /// RFC 3339 timestamp, e.g. `2026-10-16T08:15:02.123456+00:00`
    #[serde(rename = "commandSentAt")]
    pub command_sent_at: String,
}

impl CommandEnvelope {
    /// Stamp `command` with the current UTC time.
    pub fn now(command: AckCommand) -> Self {
        Self {
            command,
            command_sent_at: current_iso_timestamp(),
        }
    }
}

/// Single-field error body used by both HTTP and WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Fixed greeting returned by `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

/// Current UTC time as an ISO 8601 string with an explicit `+00:00` offset.
pub fn current_iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    #[test]
    fn test_label_received_omitted_when_absent() {
        let cmd = AckCommand {
            action: "ACK".to_string(),
            label_received: None,
        };
        assert_eq!(serde_json::to_value(&cmd).unwrap(), json!({"action": "ACK"}));
    }

    #[test]
    fn test_envelope_field_names() {
        let envelope = CommandEnvelope::now(AckCommand {
            action: "ACK".to_string(),
            label_received: Some("cam1".to_string()),
        });
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["command"]["labelReceived"], "cam1");
        let sent_at = value["commandSentAt"].as_str().unwrap();
        assert!(sent_at.ends_with("+00:00"));
        assert!(DateTime::parse_from_rfc3339(sent_at).is_ok());
    }

    #[test]
    fn test_empty_label_is_no_label() {
        assert_eq!(UploadRequest::new(Some(String::new()), vec![1]).label(), None);
        assert_eq!(UploadRequest::new(None, vec![1]).label(), None);
        assert_eq!(
            UploadRequest::new(Some("a".to_string()), vec![1]).label(),
            Some("a")
        );
    }

    #[test]
    fn test_client_frame_shapes() {
        let frame: ClientFrame = serde_json::from_str(r#"{"label": "a", "image": "AAAA"}"#).unwrap();
        assert!(matches!(
            frame,
            ClientFrame::Upload { label: Some(ref l), ref image } if l == "a" && image == "AAAA"
        ));

        let frame: ClientFrame = serde_json::from_str(r#"{"image": "AAAA", "label": null}"#).unwrap();
        assert!(matches!(frame, ClientFrame::Upload { label: None, .. }));

        let frame: ClientFrame = serde_json::from_str(r#"{"label": 5, "image": "AAAA"}"#).unwrap();
        assert!(matches!(frame, ClientFrame::Upload { label: None, .. }));

        let frame: ClientFrame = serde_json::from_str(r#"{"image": 123}"#).unwrap();
        assert!(matches!(frame, ClientFrame::Other(_)));

        let frame: ClientFrame = serde_json::from_str(r#"{"label": "a"}"#).unwrap();
        assert!(matches!(frame, ClientFrame::Other(_)));

        assert!(serde_json::from_str::<ClientFrame>("[1, 2]").is_err());
        assert!(serde_json::from_str::<ClientFrame>("not json").is_err());
    }
}
