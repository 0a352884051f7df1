//! Microphone capture channel.
//!
//! [`CaptureChannel::open`] acquires an input device and pumps fixed-size
//! frames into a depth-1 channel, so at most one frame is buffered beyond
//! the one being captured. Frames are delivered exactly once, in capture
//! order.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::AudioFrame;

/// A raw audio input device (microphone or test fake).
///
/// Implementations produce frames of [`crate::types::FRAME_SAMPLES`] f32
/// samples at [`crate::types::CAPTURE_RATE`].
#[async_trait]
pub trait InputDevice: Send {
    /// Takes exclusive use of the device.
    /// Fails with [`crate::error::Error::DeviceUnavailable`] if permission
    /// is denied or no device is present.
    async fn acquire(&mut self) -> Result<()>;

    /// Reads the next captured frame. Returns `Ok(None)` when the device
    /// has no more audio to produce.
    async fn read_frame(&mut self) -> Result<Option<AudioFrame>>;

    /// Releases the device. Idempotent; never fails.
    fn release(&mut self);
}

/// Push-based stream of captured frames.
#[derive(Debug)]
pub struct FrameStream {
    rx: mpsc::Receiver<AudioFrame>,
}

impl FrameStream {
    /// Returns the next captured frame, or `None` once capture has ended.
    pub async fn next(&mut self) -> Option<AudioFrame> {
        self.rx.recv().await
    }
}

/// Owns the input device and the pump task feeding a [`FrameStream`].
#[derive(Debug)]
pub struct CaptureChannel {
    stop: CancellationToken,
    pump: Option<JoinHandle<()>>,
}

impl CaptureChannel {
    /// Acquires the device and starts capturing.
    ///
    /// On acquisition failure the device is released before the error is
    /// returned, so no resources are left behind.
    pub async fn open(mut device: Box<dyn InputDevice>) -> Result<(Self, FrameStream)> {
        if let Err(e) = device.acquire().await {
            device.release();
            return Err(e);
        }

        // Depth 1: no buffering beyond the current frame, to bound latency.
        let (tx, rx) = mpsc::channel(1);
        let stop = CancellationToken::new();
        let pump = tokio::spawn(pump_loop(device, tx, stop.clone()));

        Ok((Self { stop, pump: Some(pump) }, FrameStream { rx }))
    }

    /// Stops the pump and releases the device. Idempotent.
    pub async fn close(&mut self) {
        self.stop.cancel();
        if let Some(pump) = self.pump.take() {
            let _ = pump.await;
        }
    }
}

async fn pump_loop(
    mut device: Box<dyn InputDevice>,
    tx: mpsc::Sender<AudioFrame>,
    stop: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = stop.cancelled() => break,
            frame = device.read_frame() => match frame {
                // The channel has depth 1, so this send can block; keep it
                // cancellable or close() would wait on a full channel.
                Ok(Some(frame)) => tokio::select! {
                    _ = stop.cancelled() => break,
                    sent = tx.send(frame) => {
                        if sent.is_err() {
                            debug!("frame receiver dropped, stopping capture");
                            break;
                        }
                    }
                },
                Ok(None) => {
                    debug!("capture device ended");
                    break;
                }
                Err(e) => {
                    warn!("capture read failed: {}", e);
                    break;
                }
            },
        }
    }
    device.release();
}
