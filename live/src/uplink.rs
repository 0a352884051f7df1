//! Uplink framing: captured frames -> wire chunks -> transport.

use tracing::debug;

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::types::{AudioFrame, WireChunk};

/// Converts captured frames to wire chunks and hands them to the
/// connection, one at a time, in order.
#[derive(Debug, Default)]
pub struct UplinkFramer {
    forwarded: u64,
    dropped: u64,
}

impl UplinkFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards one frame. Fire-and-forget: resolves once the chunk is
    /// handed to the transport, without waiting for acknowledgment.
    ///
    /// Frames arriving before the connection is ready are dropped, not
    /// queued; audio captured before the remote end can hear it is stale
    /// by the time it could be delivered. A send failure surfaces as
    /// [`Error::TransportSend`] so the session can log it, but the frame
    /// is never retried.
    pub async fn forward(
        &mut self,
        frame: AudioFrame,
        connection: Option<&dyn Connection>,
    ) -> Result<()> {
        let Some(connection) = connection else {
            self.dropped += 1;
            debug!("connection not ready, dropping frame ({} dropped)", self.dropped);
            return Ok(());
        };

        let chunk = WireChunk::from_frame(&frame);
        connection.send_chunk(chunk).await.map_err(|e| match e {
            Error::TransportSend(_) => e,
            other => Error::TransportSend(other.to_string()),
        })?;
        self.forwarded += 1;
        Ok(())
    }

    /// Number of frames handed to the transport so far.
    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }

    /// Number of frames dropped before the connection was ready.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
