//! WebSocket transport for the live conversation endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use futures::SinkExt;
use futures::stream::StreamExt;
use serde_json::json;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error};

use crate::client::ClientConfig;
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::event::ServerMessage;
use crate::types::WireChunk;

/// An established live session over a WebSocket.
///
/// Outbound messages go through a write loop fed by a channel, so sends
/// are fire-and-forget from the caller's perspective; inbound JSON is
/// parsed by a read loop and delivered in arrival order.
pub struct LiveSocket {
    write_tx: mpsc::Sender<Message>,
    event_rx: Mutex<mpsc::Receiver<Result<ServerMessage>>>,
    _read_handle: tokio::task::JoinHandle<()>,
    _write_handle: tokio::task::JoinHandle<()>,
}

impl LiveSocket {
    /// Connects, sends the session setup, and waits for the server's
    /// acknowledgment before returning a usable socket.
    pub(crate) async fn connect(config: Arc<ClientConfig>) -> Result<Self> {
        let url = format!("{}?key={}", config.ws_url, config.api_key);
        debug!("connecting to {}", config.ws_url);

        let (ws_stream, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::SessionStart(format!("failed to connect: {}", e)))?;

        let (write, read) = ws_stream.split();

        let (event_tx, event_rx) = mpsc::channel(100);
        let (write_tx, write_rx) = mpsc::channel(100);

        let write_handle = tokio::spawn(write_loop(write, write_rx));
        let read_handle = tokio::spawn(read_loop(read, event_tx));

        let socket = Self {
            write_tx,
            event_rx: Mutex::new(event_rx),
            _read_handle: read_handle,
            _write_handle: write_handle,
        };

        socket
            .send_json(json!({
                "setup": {
                    "model": format!("models/{}", config.model),
                    "generationConfig": {
                        "responseModalities": ["AUDIO"],
                        "speechConfig": {
                            "voiceConfig": {
                                "prebuiltVoiceConfig": { "voiceName": config.voice }
                            }
                        }
                    }
                }
            }))
            .await?;

        // The first server message acknowledges setup; anything else
        // means the handshake failed.
        match socket.recv().await {
            Some(Ok(msg)) if msg.is_setup_complete() => Ok(socket),
            Some(Ok(_)) => Err(Error::SessionStart(
                "unexpected message before setup acknowledgment".to_string(),
            )),
            Some(Err(e)) => Err(Error::SessionStart(e.to_string())),
            None => Err(Error::SessionStart(
                "connection closed during setup".to_string(),
            )),
        }
    }

    async fn send_json(&self, value: serde_json::Value) -> Result<()> {
        let text = value.to_string();
        debug!("sending: {}", truncate_for_log(&text, 200));
        self.write_tx
            .send(Message::Text(text.into()))
            .await
            .map_err(|_| Error::TransportSend("write loop gone".to_string()))
    }
}

#[async_trait]
impl Connection for LiveSocket {
    async fn send_chunk(&self, chunk: WireChunk) -> Result<()> {
        self.send_json(json!({
            "realtimeInput": {
                "mediaChunks": [{
                    "mimeType": chunk.mime_type,
                    "data": chunk.data,
                }]
            }
        }))
        .await
    }

    async fn recv(&self) -> Option<Result<ServerMessage>> {
        let mut rx = self.event_rx.lock().await;
        rx.recv().await
    }

    async fn close(&self) {
        let _ = self.write_tx.send(Message::Close(None)).await;
    }
}

// Write loop task
async fn write_loop(
    mut write: futures::stream::SplitSink<
        tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
        Message,
    >,
    mut rx: mpsc::Receiver<Message>,
) {
    while let Some(msg) = rx.recv().await {
        if let Message::Close(_) = msg {
            let _ = write.close().await;
            break;
        }
        if let Err(e) = write.send(msg).await {
            error!("write error: {}", e);
            break;
        }
    }
}

// Read loop task
async fn read_loop(
    mut read: futures::stream::SplitStream<
        tokio_tungstenite::WebSocketStream<
            tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
        >,
    >,
    tx: mpsc::Sender<Result<ServerMessage>>,
) {
    while let Some(result) = read.next().await {
        match result {
            Ok(Message::Text(text)) => {
                debug!("received: {}", truncate_for_log(&text, 500));
                let parsed = serde_json::from_str(&text).map_err(Error::from);
                if tx.send(parsed).await.is_err() {
                    break;
                }
            }
            Ok(Message::Binary(data)) => {
                // The endpoint may deliver JSON frames as binary.
                let parsed = serde_json::from_slice(&data).map_err(Error::from);
                if tx.send(parsed).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(frame)) => {
                debug!("websocket closed by server: {:?}", frame);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!("read error: {}", e);
                let _ = tx.send(Err(Error::WebSocket(e))).await;
                break;
            }
        }
    }
}

fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() > max_len {
        format!("{}...", &s[..max_len])
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("0123456789abc", 10), "0123456789...");
    }
}
