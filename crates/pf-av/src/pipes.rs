//! Named pipe channels connecting the decoders to the encoder.
//!
//! Each conversion job owns one audio FIFO and one video FIFO. The paths are
//! keyed by a job-unique id so concurrent jobs on the same host cannot
//! collide. FIFO write semantics are the pipeline's only synchronization:
//! a decoder blocks once the kernel buffer fills until the encoder reads.

use pf_core::{Error, Result};
use std::path::{Path, PathBuf};

/// The audio/video FIFO pair for one conversion job.
///
/// Removal is idempotent, never raises during teardown, and also runs on
/// drop, so a created pair cannot outlive its job.
#[derive(Debug)]
pub struct PipePair {
    audio: PathBuf,
    video: PathBuf,
    removed: bool,
}

impl PipePair {
    /// Create both FIFOs under `dir`, keyed by `job_id`.
    ///
    /// A stale pipe left at either path is removed first. If the second
    /// FIFO cannot be created the first is removed before returning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PipeCreation`] when the filesystem refuses either
    /// pipe, or on non-unix platforms.
    pub fn create(dir: &Path, job_id: u32) -> Result<Self> {
        let audio = dir.join(format!("stream{job_id}.wav"));
        let video = dir.join(format!("stream{job_id}.yuv"));

        make_fifo(&audio)?;
        if let Err(e) = make_fifo(&video) {
            let _ = std::fs::remove_file(&audio);
            return Err(e);
        }

        tracing::debug!(
            "created pipes {} and {}",
            audio.display(),
            video.display()
        );

        Ok(Self {
            audio,
            video,
            removed: false,
        })
    }

    /// Path of the raw PCM audio pipe.
    pub fn audio(&self) -> &Path {
        &self.audio
    }

    /// Path of the raw frame video pipe.
    pub fn video(&self) -> &Path {
        &self.video
    }

    /// Remove both pipes.
    ///
    /// An already-removed pipe counts as success; any other removal failure
    /// is logged rather than raised so teardown can never fail a job that
    /// has already completed or failed. Calling this twice is a no-op.
    pub fn remove(&mut self) {
        if self.removed {
            return;
        }
        for path in [&self.audio, &self.video] {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("failed to remove pipe {}: {e}", path.display()),
            }
        }
        self.removed = true;
    }
}

impl Drop for PipePair {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(unix)]
fn make_fifo(path: &Path) -> Result<()> {
    use nix::sys::stat::Mode;

    if path.exists() {
        std::fs::remove_file(path).map_err(|e| {
            Error::pipe_creation(path, format!("stale pipe could not be removed: {e}"))
        })?;
    }

    nix::unistd::mkfifo(path, Mode::S_IRUSR | Mode::S_IWUSR)
        .map_err(|e| Error::pipe_creation(path, e.to_string()))
}

#[cfg(not(unix))]
fn make_fifo(path: &Path) -> Result<()> {
    Err(Error::pipe_creation(
        path,
        "named pipes require a unix platform",
    ))
}
