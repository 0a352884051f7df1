//! Duplex realtime voice session for the GridWatch assistant.
//!
//! Captures microphone audio as fixed 4096-sample frames at 16kHz, frames
//! it as base64 PCM16 for a streaming WebSocket transport, and schedules
//! incrementally arriving 24kHz synthesized speech for gap-free,
//! overlap-free playback.
//!
//! The crate is built around three seams so the core can run against real
//! hardware and a hosted endpoint, or against test fakes:
//!
//! - [`InputDevice`]: microphone acquisition and frame production
//! - [`OutputDevice`]: absolute-time playback scheduling with a monotonic
//!   reference clock
//! - [`Connection`] / [`Connector`]: the remote conversation transport
//!
//! # Example
//!
//! ```rust,no_run
//! use gridwatch_live::{Client, SessionController};
//! # use gridwatch_live::{InputDevice, OutputDevice};
//! # fn microphone() -> Box<dyn InputDevice> { unimplemented!() }
//! # fn speaker() -> Box<dyn OutputDevice> { unimplemented!() }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("your-api-key")?;
//!     let mut session = SessionController::new(Box::new(client));
//!     session.on_close(|reason| {
//!         if let Some(e) = reason {
//!             eprintln!("session ended: {}", e);
//!         }
//!     });
//!
//!     session.start(microphone(), speaker()).await?;
//!     tokio::time::sleep(std::time::Duration::from_secs(30)).await;
//!     session.stop().await;
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod client;
pub mod connection;
pub mod error;
pub mod event;
pub mod playback;
pub mod session;
pub mod types;
pub mod uplink;
pub mod websocket;

// Re-export main types
pub use capture::{CaptureChannel, FrameStream, InputDevice};
pub use client::{Client, DEFAULT_MODEL, DEFAULT_VOICE, DEFAULT_WS_URL};
pub use connection::{Connection, Connector};
pub use error::{Error, Result};
pub use event::ServerMessage;
pub use playback::{OutputDevice, PlaybackScheduler};
pub use session::{SessionController, SessionState};
pub use types::{
    AudioFrame, CAPTURE_RATE, FRAME_SAMPLES, PLAYBACK_RATE, PlaybackSegment, WireChunk,
};
pub use uplink::UplinkFramer;
pub use websocket::LiveSocket;
