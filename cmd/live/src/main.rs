//! Drives a live voice session from a raw PCM file.
//!
//! Reads 16kHz mono PCM16 from `--input`, streams it to the endpoint at
//! the real capture cadence, and writes the synthesized 24kHz reply audio
//! to `--output` as raw PCM16.
//!
//! Usage:
//!   live --input question.pcm --output answer.pcm
//!   GEMINI_API_KEY=... live --input question.pcm --voice Puck

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use gridwatch_audio::pcm;
use gridwatch_live::{
    AudioFrame, CAPTURE_RATE, Client, FRAME_SAMPLES, InputDevice, OutputDevice,
    SessionController,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "live")]
#[command(about = "GridWatch live voice session")]
struct Args {
    /// API key for the live endpoint
    #[arg(long, default_value_t = std::env::var("GEMINI_API_KEY").unwrap_or_default())]
    api_key: String,

    /// Input file: raw 16kHz mono PCM16
    #[arg(long)]
    input: PathBuf,

    /// Output file for the 24kHz mono PCM16 reply
    #[arg(long, default_value = "reply.pcm")]
    output: PathBuf,

    /// Conversation model
    #[arg(long)]
    model: Option<String>,

    /// Synthesized voice name
    #[arg(long)]
    voice: Option<String>,

    /// Seconds to wait for reply audio after the input is exhausted
    #[arg(long, default_value = "10")]
    linger: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Feeds file audio as frames at the real capture cadence.
struct PcmFileMic {
    frames: VecDeque<AudioFrame>,
    cadence: Duration,
}

impl PcmFileMic {
    fn new(samples: Vec<f32>) -> Self {
        let mut frames = VecDeque::new();
        for chunk in samples.chunks(FRAME_SAMPLES) {
            let mut padded = chunk.to_vec();
            padded.resize(FRAME_SAMPLES, 0.0);
            frames.push_back(AudioFrame::new(padded));
        }
        let cadence =
            Duration::from_secs_f64(FRAME_SAMPLES as f64 / CAPTURE_RATE as f64);
        Self { frames, cadence }
    }
}

#[async_trait]
impl InputDevice for PcmFileMic {
    async fn acquire(&mut self) -> gridwatch_live::Result<()> {
        Ok(())
    }

    async fn read_frame(&mut self) -> gridwatch_live::Result<Option<AudioFrame>> {
        match self.frames.pop_front() {
            Some(frame) => {
                tokio::time::sleep(self.cadence).await;
                Ok(Some(frame))
            }
            None => {
                // Keep the session open so the reply can finish arriving.
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }

    fn release(&mut self) {
        self.frames.clear();
    }
}

/// Collects scheduled reply audio instead of playing it.
struct FileSpeaker {
    epoch: Instant,
    collected: Arc<Mutex<Vec<f32>>>,
}

impl OutputDevice for FileSpeaker {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn schedule(&mut self, samples: Vec<f32>, _start_time: f64) -> gridwatch_live::Result<()> {
        self.collected.lock().unwrap().extend_from_slice(&samples);
        Ok(())
    }

    fn stop_all(&mut self) {}
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let samples = pcm::pcm16_to_float(&bytes).context("decoding input PCM")?;
    let input_secs = samples.len() as f64 / CAPTURE_RATE as f64;
    info!("loaded {:.1}s of input audio", input_secs);

    let mut client = Client::new(&args.api_key)?;
    if let Some(model) = args.model {
        client = client.with_model(model);
    }
    if let Some(voice) = args.voice {
        client = client.with_voice(voice);
    }

    let collected = Arc::new(Mutex::new(Vec::new()));
    let mut session = SessionController::new(Box::new(client));
    let (closed_tx, closed_rx) = tokio::sync::oneshot::channel();
    session.on_close(move |reason| {
        let _ = closed_tx.send(reason);
    });

    info!("starting session");
    session
        .start(
            Box::new(PcmFileMic::new(samples)),
            Box::new(FileSpeaker {
                epoch: Instant::now(),
                collected: collected.clone(),
            }),
        )
        .await?;

    let deadline = Duration::from_secs_f64(input_secs) + Duration::from_secs(args.linger);
    tokio::select! {
        _ = tokio::time::sleep(deadline) => info!("done waiting for reply audio"),
        reason = closed_rx => {
            if let Ok(Some(e)) = reason {
                info!("session closed early: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
    }
    session.stop().await;

    let reply = collected.lock().unwrap().clone();
    let reply_bytes = pcm::float_to_pcm16(&reply);
    std::fs::write(&args.output, &reply_bytes)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(
        "wrote {:.1}s of reply audio to {}",
        reply.len() as f64 / 24000.0,
        args.output.display()
    );
    Ok(())
}
