//! Gap-free, overlap-free playback scheduling.

use tracing::debug;

use crate::error::Result;
use crate::types::PlaybackSegment;

/// An audio output sink with an absolute-time scheduling interface.
///
/// Mirrors how hardware audio contexts work: a monotonic clock plus
/// "start this buffer at time t" scheduling.
pub trait OutputDevice: Send {
    /// Current time on the device's monotonic reference clock, in seconds.
    fn now(&self) -> f64;

    /// Schedules a buffer of f32 samples at [`crate::types::PLAYBACK_RATE`]
    /// to begin playing at `start_time` on the reference clock.
    fn schedule(&mut self, samples: Vec<f32>, start_time: f64) -> Result<()>;

    /// Stops all scheduled and in-flight output immediately.
    fn stop_all(&mut self);
}

/// Schedules inbound segments back-to-back on the output device.
///
/// Keeps a playback cursor: the earliest time the device is free. Each
/// segment starts at `max(now, cursor)`, so segments that arrive faster
/// than real time queue gaplessly while late arrivals leave a silent gap
/// (accepted; no look-ahead buffering or gap correction).
pub struct PlaybackScheduler {
    device: Box<dyn OutputDevice>,
    cursor: f64,
}

impl PlaybackScheduler {
    pub fn new(device: Box<dyn OutputDevice>) -> Self {
        Self { device, cursor: 0.0 }
    }

    /// Decodes one inbound base64 PCM16 payload and schedules it.
    ///
    /// Returns the scheduled start time. A malformed payload fails without
    /// touching the cursor; the caller drops the segment and continues.
    pub fn enqueue(&mut self, payload: &str) -> Result<f64> {
        let segment = PlaybackSegment::decode(payload)?;
        let start = self.device.now().max(self.cursor);
        let duration = segment.duration();
        self.device.schedule(segment.into_samples(), start)?;
        self.cursor = start + duration;
        debug!("scheduled {:.3}s segment at t={:.3}", duration, start);
        Ok(start)
    }

    /// Earliest time the output device is next free.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Stops all in-flight output and discards the cursor.
    /// Called on session stop.
    pub fn reset(&mut self) {
        self.device.stop_all();
        self.cursor = 0.0;
    }
}
