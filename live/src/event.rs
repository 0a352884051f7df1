//! Wire message model for the live conversation endpoint.
//!
//! The endpoint speaks JSON over a WebSocket. Outbound messages are small
//! and assembled inline by the socket (`setup`, `realtimeInput`); inbound
//! messages are deserialized into [`ServerMessage`].

use serde::Deserialize;

/// Message received from the live endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerMessage {
    /// Acknowledges the client's setup message.
    #[serde(default)]
    pub setup_complete: Option<SetupComplete>,

    /// Incremental model output.
    #[serde(default)]
    pub server_content: Option<ServerContent>,

    /// The server is about to drop the connection.
    #[serde(default)]
    pub go_away: Option<GoAway>,
}

impl ServerMessage {
    /// Returns true once the server has acknowledged session setup.
    pub fn is_setup_complete(&self) -> bool {
        self.setup_complete.is_some()
    }

    /// Base64 audio payload carried by this message, if any.
    pub fn audio_base64(&self) -> Option<&str> {
        self.server_content
            .as_ref()?
            .model_turn
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.inline_data.as_ref())
            .map(|d| d.data.as_str())
    }

    /// Returns true if this message ends a model turn.
    pub fn is_turn_complete(&self) -> bool {
        self.server_content
            .as_ref()
            .and_then(|c| c.turn_complete)
            .unwrap_or(false)
    }
}

/// Empty setup acknowledgment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetupComplete {}

/// Incremental content produced by the model.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerContent {
    /// Partial model output for the current turn.
    #[serde(default)]
    pub model_turn: Option<ModelTurn>,

    /// Set when the model has finished the current turn.
    #[serde(default)]
    pub turn_complete: Option<bool>,

    /// Set when user speech interrupted the model turn.
    #[serde(default)]
    pub interrupted: Option<bool>,
}

/// One increment of model output.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelTurn {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single content part; audio arrives as inline data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub inline_data: Option<InlineData>,
}

/// Binary payload embedded in a content part.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,

    /// Base64 payload.
    #[serde(default)]
    pub data: String,
}

/// Connection shutdown notice from the server.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoAway {
    /// Remaining time before the connection is dropped, e.g. "10s".
    #[serde(default)]
    pub time_left: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setup_complete() {
        let msg: ServerMessage = serde_json::from_str(r#"{"setupComplete": {}}"#).unwrap();
        assert!(msg.is_setup_complete());
        assert!(msg.audio_base64().is_none());
    }

    #[test]
    fn test_parse_audio_message() {
        let json = r#"{
            "serverContent": {
                "modelTurn": {
                    "parts": [
                        {"inlineData": {"mimeType": "audio/pcm;rate=24000", "data": "AAAA"}}
                    ]
                }
            }
        }"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.audio_base64(), Some("AAAA"));
        assert!(!msg.is_turn_complete());
    }

    #[test]
    fn test_parse_turn_complete() {
        let json = r#"{"serverContent": {"turnComplete": true}}"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        assert!(msg.is_turn_complete());
        assert!(msg.audio_base64().is_none());
    }

    #[test]
    fn test_parse_go_away() {
        let json = r#"{"goAway": {"timeLeft": "10s"}}"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.go_away.unwrap().time_left.as_deref(), Some("10s"));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let json = r#"{"usageMetadata": {"totalTokenCount": 42}}"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        assert!(!msg.is_setup_complete());
        assert!(msg.server_content.is_none());
    }

    #[test]
    fn test_text_part_without_audio() {
        let json = r#"{
            "serverContent": {"modelTurn": {"parts": [{"text": "hello"}]}}
        }"#;
        let msg: ServerMessage = serde_json::from_str(json).unwrap();
        assert!(msg.audio_base64().is_none());
    }
}
