//! Connection seam between the session core and the remote endpoint.

use async_trait::async_trait;

use crate::error::Result;
use crate::event::ServerMessage;
use crate::types::WireChunk;

/// An established duplex connection to the live conversation endpoint.
///
/// `send_chunk` is fire-and-forget: it resolves once the chunk is handed to
/// the transport, with no delivery acknowledgment. Messages come back in
/// arrival order through `recv`.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Hands one audio chunk to the transport.
    async fn send_chunk(&self, chunk: WireChunk) -> Result<()>;

    /// Receives the next message from the server.
    /// Returns `None` once the connection is closed.
    async fn recv(&self) -> Option<Result<ServerMessage>>;

    /// Closes the connection. Best effort; errors are swallowed.
    async fn close(&self);
}

/// Opens a fresh [`Connection`] for each session start.
///
/// The session controller never holds a connection across sessions; the
/// connector is the only long-lived handle.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Connection>>;
}
