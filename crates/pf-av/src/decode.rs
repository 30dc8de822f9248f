//! Decoder process launchers.
//!
//! Each decoder is an mplayer invocation that reads the source file and
//! streams one elementary stream into its pipe: scaled yuv4mpeg frames for
//! video, raw PCM for audio. Both are started without waiting on them; the
//! orchestrator only ever blocks on the encoder.

use pf_core::{Error, Result, StreamKind, TargetResolution};
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};

/// Argv for the video decoder: scale and sharpen to the target resolution,
/// render subtitles, write yuv4mpeg into the video pipe, audio disabled,
/// frame dropping disabled.
pub fn video_decoder_args(
    input: &Path,
    target: TargetResolution,
    video_pipe: &Path,
    passthrough: &[String],
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-sws".into(),
        "9".into(),
        "-vf".into(),
        format!(
            "scale={w}:{h},dsize={w}:{h},unsharp=c4x4:0.3:l5x5:0.5",
            w = target.width,
            h = target.height
        ),
        "-ass".into(),
        "-vo".into(),
        format!("yuv4mpeg:file={}", video_pipe.display()),
        "-ao".into(),
        "null".into(),
        "-nosound".into(),
        "-noframedrop".into(),
        "-benchmark".into(),
        "-quiet".into(),
        "-nolirc".into(),
        "-msglevel".into(),
        "all=-1".into(),
        input.display().to_string(),
    ];
    args.extend(passthrough.iter().cloned());
    args
}

/// Argv for the audio decoder: write raw PCM into the audio pipe, video
/// decoding disabled.
pub fn audio_decoder_args(input: &Path, audio_pipe: &Path, passthrough: &[String]) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-ao".into(),
        format!("pcm:file={}", audio_pipe.display()),
        "-vo".into(),
        "null".into(),
        "-vc".into(),
        "null".into(),
        "-noframedrop".into(),
        "-quiet".into(),
        "-nolirc".into(),
        "-msglevel".into(),
        "all=-1".into(),
        input.display().to_string(),
    ];
    args.extend(passthrough.iter().cloned());
    args
}

/// Start one decoder without waiting on it.
///
/// The child is spawned with `kill_on_drop` so an orchestrator that bails
/// out early can never leak it.
///
/// # Errors
///
/// Returns [`Error::DecodeLaunch`] if the process cannot be spawned.
pub fn spawn_decoder(mplayer: &Path, stream: StreamKind, args: &[String]) -> Result<Child> {
    tracing::debug!("starting {stream} decoder: {} {}", mplayer.display(), args.join(" "));

    Command::new(mplayer)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::decode_launch(stream, e.to_string()))
}
