//! Client for the hosted live conversation endpoint.

use std::sync::Arc;

use async_trait::async_trait;

use crate::connection::{Connection, Connector};
use crate::error::{Error, Result};
use crate::websocket::LiveSocket;

/// Default WebSocket endpoint for bidirectional generation.
pub const DEFAULT_WS_URL: &str =
    "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";

/// Default native-audio conversation model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-native-audio-preview-12-2025";

/// Default synthesized voice.
pub const DEFAULT_VOICE: &str = "Zephyr";

/// Live conversation client. One client can open many sessions; each
/// `connect()` yields an independent socket.
pub struct Client {
    config: Arc<ClientConfig>,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub(crate) struct ClientConfig {
    pub api_key: String,
    pub ws_url: String,
    pub model: String,
    pub voice: String,
}

impl Client {
    /// Creates a new client for the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::InvalidConfig("API key is required".to_string()));
        }
        Ok(Self {
            config: Arc::new(ClientConfig {
                api_key,
                ws_url: DEFAULT_WS_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
                voice: DEFAULT_VOICE.to_string(),
            }),
        })
    }

    /// Sets the conversation model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).model = model.into();
        self
    }

    /// Sets the synthesized voice name.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).voice = voice.into();
        self
    }

    /// Sets the WebSocket endpoint URL.
    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).ws_url = url.into();
        self
    }

    /// Opens a WebSocket to the endpoint, performs setup, and waits for
    /// the server's acknowledgment.
    pub async fn connect(&self) -> Result<LiveSocket> {
        LiveSocket::connect(self.config.clone()).await
    }
}

#[async_trait]
impl Connector for Client {
    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(Client::connect(self).await?))
    }
}
