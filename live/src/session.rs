//! Session lifecycle: one duplex voice conversation from start to stop.

use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::capture::{CaptureChannel, FrameStream, InputDevice};
use crate::connection::{Connection, Connector};
use crate::error::{Error, Result};
use crate::playback::{OutputDevice, PlaybackScheduler};
use crate::uplink::UplinkFramer;

/// Lifecycle state of a voice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session has been started.
    Idle,
    /// Acquiring the capture device and opening the remote connection.
    Acquiring,
    /// Duplex streaming is running.
    Active,
    /// Teardown in progress.
    Closing,
    /// The session has ended. A new `start()` is required to talk again.
    Closed,
}

/// Invoked once when the session reaches `Closed`.
/// `None` for a local stop or end of input; `Some` for a remote cause.
pub type CloseCallback = Box<dyn FnOnce(Option<Error>) + Send + 'static>;

/// Drives one voice session: owns the capture channel, the uplink framer,
/// the playback scheduler, and the per-session remote connection.
///
/// Everything runs on one cooperative pump task; there is no parallel
/// mutation of session state. The microphone and output device belong to
/// at most one active session, so a second `start()` while running fails
/// with [`Error::SessionAlreadyActive`] instead of acquiring a second
/// device handle. There is no automatic reconnect: any failure or remote
/// close ends the session and the caller decides whether to start again.
pub struct SessionController {
    connector: Box<dyn Connector>,
    shared: Arc<Shared>,
    pump: Option<JoinHandle<()>>,
}

struct Shared {
    state: Mutex<SessionState>,
    on_close: Mutex<Option<CloseCallback>>,
    inner: tokio::sync::Mutex<Inner>,
}

/// Per-session resources, torn down together.
struct Inner {
    capture: Option<CaptureChannel>,
    scheduler: Option<PlaybackScheduler>,
    conn: Option<Arc<dyn Connection>>,
    stop: CancellationToken,
}

impl SessionController {
    /// Creates a controller. The connector opens a fresh connection on
    /// each `start()`; no connection outlives its session.
    pub fn new(connector: Box<dyn Connector>) -> Self {
        Self {
            connector,
            shared: Arc::new(Shared {
                state: Mutex::new(SessionState::Idle),
                on_close: Mutex::new(None),
                inner: tokio::sync::Mutex::new(Inner {
                    capture: None,
                    scheduler: None,
                    conn: None,
                    stop: CancellationToken::new(),
                }),
            }),
            pump: None,
        }
    }

    /// Registers the close callback for the next session.
    /// Consumed when the session closes; register again before restarting.
    pub fn on_close(&self, callback: impl FnOnce(Option<Error>) + Send + 'static) {
        *self.shared.on_close.lock().unwrap() = Some(Box::new(callback));
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        *self.shared.state.lock().unwrap()
    }

    /// Starts a session: acquires the capture device, connects to the
    /// remote endpoint, and begins duplex streaming.
    ///
    /// Fails with [`Error::DeviceUnavailable`] (no connection is opened)
    /// or [`Error::SessionStart`] (already-acquired resources are torn
    /// down). After a failed start the state is `Closed`.
    pub async fn start(
        &mut self,
        input: Box<dyn InputDevice>,
        output: Box<dyn OutputDevice>,
    ) -> Result<()> {
        {
            let mut state = self.shared.state.lock().unwrap();
            match *state {
                SessionState::Idle | SessionState::Closed => *state = SessionState::Acquiring,
                _ => return Err(Error::SessionAlreadyActive),
            }
        }

        let (capture, frames) = match CaptureChannel::open(input).await {
            Ok(opened) => opened,
            Err(e) => {
                *self.shared.state.lock().unwrap() = SessionState::Closed;
                return Err(e);
            }
        };

        let conn: Arc<dyn Connection> = match self.connector.connect().await {
            Ok(conn) => Arc::from(conn),
            Err(e) => {
                let mut capture = capture;
                capture.close().await;
                *self.shared.state.lock().unwrap() = SessionState::Closed;
                return Err(match e {
                    Error::SessionStart(_) => e,
                    other => Error::SessionStart(other.to_string()),
                });
            }
        };

        let stop = CancellationToken::new();
        {
            let mut inner = self.shared.inner.lock().await;
            inner.capture = Some(capture);
            inner.scheduler = Some(PlaybackScheduler::new(output));
            inner.conn = Some(conn.clone());
            inner.stop = stop.clone();
        }
        *self.shared.state.lock().unwrap() = SessionState::Active;

        self.pump = Some(tokio::spawn(pump_loop(
            self.shared.clone(),
            frames,
            conn,
            stop,
        )));
        Ok(())
    }

    /// Stops the session and releases all resources. Safe to call from
    /// any state and any number of times; stopping a closed session is a
    /// no-op.
    pub async fn stop(&mut self) {
        let stop = self.shared.inner.lock().await.stop.clone();
        stop.cancel();
        teardown(&self.shared, None).await;
        if let Some(pump) = self.pump.take() {
            let _ = pump.await;
        }
    }
}

/// The single event loop of an active session: captured frames go up,
/// inbound audio goes to the scheduler, and a remote close or error ends
/// everything.
async fn pump_loop(
    shared: Arc<Shared>,
    mut frames: FrameStream,
    conn: Arc<dyn Connection>,
    stop: CancellationToken,
) {
    let mut uplink = UplinkFramer::new();
    let reason = loop {
        tokio::select! {
            _ = stop.cancelled() => break None,
            frame = frames.next() => match frame {
                Some(frame) => {
                    // A failed send loses that frame only; capture goes on.
                    if let Err(e) = uplink.forward(frame, Some(conn.as_ref())).await {
                        warn!("{}", e);
                    }
                }
                None => {
                    debug!("capture ended");
                    break None;
                }
            },
            msg = conn.recv() => match msg {
                Some(Ok(msg)) => {
                    if let Some(audio) = msg.audio_base64() {
                        let mut inner = shared.inner.lock().await;
                        if let Some(scheduler) = inner.scheduler.as_mut() {
                            if let Err(e) = scheduler.enqueue(audio) {
                                warn!("dropping malformed segment: {}", e);
                            }
                        }
                    }
                    if msg.is_turn_complete() {
                        debug!("model turn complete");
                    }
                    if msg.go_away.is_some() {
                        debug!("server requested shutdown");
                    }
                }
                Some(Err(e)) => break Some(Error::Remote(e.to_string())),
                None => break Some(Error::RemoteClosed),
            },
        }
    };
    teardown(&shared, reason).await;
}

/// Releases session resources in reverse acquisition order: capture
/// device and graph first, then the output context, then the connection
/// reference. Best effort throughout; teardown itself never fails.
async fn teardown(shared: &Shared, reason: Option<Error>) {
    {
        let mut state = shared.state.lock().unwrap();
        match *state {
            SessionState::Idle | SessionState::Closing | SessionState::Closed => return,
            _ => *state = SessionState::Closing,
        }
    }

    let (capture, scheduler, conn) = {
        let mut inner = shared.inner.lock().await;
        (inner.capture.take(), inner.scheduler.take(), inner.conn.take())
    };
    if let Some(mut capture) = capture {
        capture.close().await;
    }
    if let Some(mut scheduler) = scheduler {
        scheduler.reset();
    }
    if let Some(conn) = conn {
        conn.close().await;
    }

    *shared.state.lock().unwrap() = SessionState::Closed;

    let callback = shared.on_close.lock().unwrap().take();
    if let Some(callback) = callback {
        if let Some(ref e) = reason {
            warn!("session closed: {}", e);
        }
        callback(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct NeverConnector {
        called: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Connector for NeverConnector {
        async fn connect(&self) -> Result<Box<dyn Connection>> {
            self.called.store(true, Ordering::SeqCst);
            Err(Error::SessionStart("unreachable endpoint".into()))
        }
    }

    struct DeniedMic;

    #[async_trait]
    impl InputDevice for DeniedMic {
        async fn acquire(&mut self) -> Result<()> {
            Err(Error::DeviceUnavailable("permission denied".into()))
        }
        async fn read_frame(&mut self) -> Result<Option<crate::types::AudioFrame>> {
            Ok(None)
        }
        fn release(&mut self) {}
    }

    struct NullOutput;

    impl OutputDevice for NullOutput {
        fn now(&self) -> f64 {
            0.0
        }
        fn schedule(&mut self, _samples: Vec<f32>, _start_time: f64) -> Result<()> {
            Ok(())
        }
        fn stop_all(&mut self) {}
    }

    #[tokio::test]
    async fn test_device_failure_never_opens_connection() {
        let called = Arc::new(AtomicBool::new(false));
        let mut session =
            SessionController::new(Box::new(NeverConnector { called: called.clone() }));

        let err = session
            .start(Box::new(DeniedMic), Box::new(NullOutput))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DeviceUnavailable(_)));
        assert_eq!(session.state(), SessionState::Closed);
        assert!(!called.load(Ordering::SeqCst));
    }

    struct IdleMic {
        releases: Arc<std::sync::atomic::AtomicUsize>,
    }

    #[async_trait]
    impl InputDevice for IdleMic {
        async fn acquire(&mut self) -> Result<()> {
            Ok(())
        }
        async fn read_frame(&mut self) -> Result<Option<crate::types::AudioFrame>> {
            std::future::pending::<()>().await;
            unreachable!()
        }
        fn release(&mut self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_connect_failure_tears_down_capture() {
        let called = Arc::new(AtomicBool::new(false));
        let releases = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut session =
            SessionController::new(Box::new(NeverConnector { called: called.clone() }));

        let err = session
            .start(
                Box::new(IdleMic { releases: releases.clone() }),
                Box::new(NullOutput),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SessionStart(_)));
        assert_eq!(session.state(), SessionState::Closed);
        assert!(called.load(Ordering::SeqCst));
        assert_eq!(releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stop_from_idle_is_a_no_op() {
        let called = Arc::new(AtomicBool::new(false));
        let mut session = SessionController::new(Box::new(NeverConnector { called }));
        assert_eq!(session.state(), SessionState::Idle);
        session.stop().await;
        session.stop().await;
        assert_eq!(session.state(), SessionState::Idle);
    }
}
