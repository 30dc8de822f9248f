//! One conversion job: the pipe pair, the decoder handles, the encoder run,
//! and a teardown that every exit path converges on.
//!
//! Ordering is the pipeline's contract: pipes exist before the decoders
//! start, the decoders start before the encoder, and the encoder's open of
//! both pipes is what unblocks the decoders' writes. No other handshake
//! exists.

use pf_av::decode::{audio_decoder_args, spawn_decoder, video_decoder_args};
use pf_av::encode::{encoder_args, spawn_encoder};
use pf_av::pipes::PipePair;
use pf_core::config::ConversionSettings;
use pf_core::{Error, Result, StreamKind, TargetResolution};
use std::path::Path;
use std::time::Duration;
use tokio::process::Child;

/// How long teardown waits for still-running decoders to drain before
/// killing them.
const TEARDOWN_GRACE: Duration = Duration::from_secs(2);

/// Lifecycle of a [`ConversionJob`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    PipesCreated,
    DecodersRunning,
    Encoding,
    Done,
    Failed,
    Cleaned,
}

/// Everything one conversion owns: both FIFOs and the decoder handles.
///
/// Decoder handles are retained so [`ConversionJob::cleanup`] can terminate
/// them when the job aborts early; the encoder handle lives only inside
/// [`ConversionJob::run_encoder`]. All children are spawned with
/// `kill_on_drop`, and the pipe pair removes itself on drop, so even a
/// panicking orchestrator leaks nothing.
pub struct ConversionJob {
    pipes: PipePair,
    video_decoder: Option<Child>,
    audio_decoder: Option<Child>,
    state: JobState,
    grace: Duration,
}

impl ConversionJob {
    /// Create the job's pipe pair under `scratch_dir`, keyed by this
    /// process's id so concurrent jobs on the host cannot collide.
    pub fn create(scratch_dir: &Path) -> Result<Self> {
        let pipes = PipePair::create(scratch_dir, std::process::id())?;
        Ok(Self {
            pipes,
            video_decoder: None,
            audio_decoder: None,
            state: JobState::PipesCreated,
            grace: TEARDOWN_GRACE,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Start both decoders without waiting on them.
    ///
    /// If the audio decoder fails to start after the video decoder is
    /// already running, the error propagates and the caller's cleanup
    /// terminates the survivor.
    pub fn spawn_decoders(
        &mut self,
        mplayer: &Path,
        input: &Path,
        target: TargetResolution,
        passthrough: &[String],
    ) -> Result<()> {
        let args = video_decoder_args(input, target, self.pipes.video(), passthrough);
        match spawn_decoder(mplayer, StreamKind::Video, &args) {
            Ok(child) => self.video_decoder = Some(child),
            Err(e) => {
                self.state = JobState::Failed;
                return Err(e);
            }
        }

        let args = audio_decoder_args(input, self.pipes.audio(), passthrough);
        match spawn_decoder(mplayer, StreamKind::Audio, &args) {
            Ok(child) => self.audio_decoder = Some(child),
            Err(e) => {
                self.state = JobState::Failed;
                return Err(e);
            }
        }

        self.state = JobState::DecodersRunning;
        Ok(())
    }

    /// Run the encoder to completion, blocking until ffmpeg exits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the encoder cannot be started, dies
    /// abnormally, or exits non-zero. A partial output file may remain.
    pub async fn run_encoder(
        &mut self,
        ffmpeg: &Path,
        settings: &ConversionSettings,
        output: &Path,
    ) -> Result<()> {
        let args = encoder_args(self.pipes.video(), self.pipes.audio(), settings, output);

        self.state = JobState::Encoding;
        let mut encoder = match spawn_encoder(ffmpeg, &args) {
            Ok(child) => child,
            Err(e) => {
                self.state = JobState::Failed;
                return Err(e);
            }
        };

        let status = match encoder.wait().await {
            Ok(status) => status,
            Err(e) => {
                self.state = JobState::Failed;
                return Err(Error::encode(format!("failed waiting for ffmpeg: {e}")));
            }
        };

        if status.success() {
            self.state = JobState::Done;
            Ok(())
        } else {
            self.state = JobState::Failed;
            Err(Error::encode(format!("ffmpeg exited with {status}")))
        }
    }

    /// Tear the job down.
    ///
    /// Decoders that are still running get a short grace period to drain,
    /// then are killed; already-exited ones are only reaped. The pipes are
    /// removed last. Every step tolerates partial failure, and calling this
    /// again after it has run once is a no-op, so double signal delivery is
    /// harmless.
    pub async fn cleanup(&mut self) {
        if self.state == JobState::Cleaned {
            return;
        }

        let mut decoders: Vec<(StreamKind, Child)> = Vec::new();
        if let Some(child) = self.video_decoder.take() {
            decoders.push((StreamKind::Video, child));
        }
        if let Some(child) = self.audio_decoder.take() {
            decoders.push((StreamKind::Audio, child));
        }

        let mut running: Vec<(StreamKind, Child)> = Vec::new();
        for (kind, mut child) in decoders {
            match child.try_wait() {
                Ok(Some(status)) => tracing::debug!("{kind} decoder already exited with {status}"),
                Ok(None) => running.push((kind, child)),
                Err(e) => tracing::debug!("{kind} decoder state unknown: {e}"),
            }
        }

        if !running.is_empty() {
            tokio::time::sleep(self.grace).await;
            for (kind, mut child) in running {
                match child.try_wait() {
                    Ok(Some(status)) => tracing::debug!("{kind} decoder exited with {status}"),
                    _ => {
                        tracing::debug!("terminating {kind} decoder");
                        if let Err(e) = child.kill().await {
                            tracing::warn!("failed to terminate {kind} decoder: {e}");
                        }
                    }
                }
            }
        }

        self.pipes.remove();
        self.state = JobState::Cleaned;
    }
}
