//! Encoder process runner.
//!
//! One ffmpeg invocation reads the video pipe as a yuv4mpeg frame stream and
//! the audio pipe as raw PCM, encodes baseline-profile H.264 and stereo AAC,
//! and muxes straight into the output MP4. The orchestrator blocks on this
//! process; it is the only stage whose exit status decides the job.

use pf_core::config::{ConversionSettings, CRF_MAX};
use pf_core::{Error, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};

/// Argv for the encoder.
///
/// `video_rate` keeps its dual meaning: values above [`CRF_MAX`] select
/// constant-bitrate mode in kbit/s, values at or below it are passed as a
/// constant-quality factor.
pub fn encoder_args(
    video_pipe: &Path,
    audio_pipe: &Path,
    settings: &ConversionSettings,
    output: &Path,
) -> Vec<String> {
    let (rate_flag, rate_value) = if settings.video_rate > CRF_MAX {
        ("-b:v", (settings.video_rate * 1000).to_string())
    } else {
        ("-crf", settings.video_rate.to_string())
    };

    vec![
        "-f".into(),
        "yuv4mpegpipe".into(),
        "-i".into(),
        video_pipe.display().to_string(),
        "-i".into(),
        audio_pipe.display().to_string(),
        "-acodec".into(),
        "aac".into(),
        "-strict".into(),
        "experimental".into(),
        "-ac".into(),
        "2".into(),
        "-ab".into(),
        settings.audio_bitrate.to_string(),
        "-ar".into(),
        "44100".into(),
        "-vcodec".into(),
        "libx264".into(),
        "-threads".into(),
        settings.threads.to_string(),
        "-vprofile".into(),
        "baseline".into(),
        "-tune".into(),
        "animation".into(),
        rate_flag.into(),
        rate_value,
        "-flags".into(),
        "+loop".into(),
        "-cmp".into(),
        "+chroma".into(),
        "-coder".into(),
        "0".into(),
        "-partitions".into(),
        "+parti4x4+partp8x8+partb8x8".into(),
        "-subq".into(),
        "7".into(),
        "-trellis".into(),
        "1".into(),
        "-refs".into(),
        "3".into(),
        "-me_range".into(),
        "16".into(),
        "-me_method".into(),
        "hex".into(),
        "-bufsize".into(),
        "10M".into(),
        "-maxrate".into(),
        "1000000".into(),
        "-x264opts".into(),
        "level=3.1".into(),
        "-f".into(),
        "mp4".into(),
        output.display().to_string(),
    ]
}

/// Start the encoder.
///
/// stdout/stderr are inherited so encode progress stays visible; the child
/// carries `kill_on_drop` so an interrupted orchestrator cannot leak it.
///
/// # Errors
///
/// Returns [`Error::Encode`] if the process cannot be spawned.
pub fn spawn_encoder(ffmpeg: &Path, args: &[String]) -> Result<Child> {
    tracing::debug!("starting encoder: {} {}", ffmpeg.display(), args.join(" "));

    Command::new(ffmpeg)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::encode(format!("failed to start ffmpeg: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::Threads;

    fn args_for(settings: &ConversionSettings) -> Vec<String> {
        encoder_args(
            Path::new("/tmp/stream1.yuv"),
            Path::new("/tmp/stream1.wav"),
            settings,
            Path::new("out.mp4"),
        )
    }

    fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .map(|i| args[i + 1].as_str())
    }

    #[test]
    fn reads_video_pipe_first_as_yuv4mpeg() {
        let args = args_for(&ConversionSettings::default());
        let head: Vec<&str> = args.iter().take(6).map(String::as_str).collect();
        assert_eq!(
            head,
            vec![
                "-f",
                "yuv4mpegpipe",
                "-i",
                "/tmp/stream1.yuv",
                "-i",
                "/tmp/stream1.wav"
            ]
        );
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn low_rate_selects_quality_mode() {
        let args = args_for(&ConversionSettings::default());
        assert_eq!(flag_value(&args, "-crf"), Some("22"));
        assert!(!args.contains(&"-b:v".to_string()));
    }

    #[test]
    fn high_rate_selects_bitrate_mode() {
        let settings = ConversionSettings {
            video_rate: 800,
            ..Default::default()
        };
        let args = args_for(&settings);
        assert_eq!(flag_value(&args, "-b:v"), Some("800000"));
        assert!(!args.contains(&"-crf".to_string()));
    }

    #[test]
    fn rate_threshold_boundary() {
        let at_max = ConversionSettings {
            video_rate: CRF_MAX,
            ..Default::default()
        };
        assert_eq!(flag_value(&args_for(&at_max), "-crf"), Some("51"));

        let above_max = ConversionSettings {
            video_rate: CRF_MAX + 1,
            ..Default::default()
        };
        assert_eq!(flag_value(&args_for(&above_max), "-b:v"), Some("52000"));
    }

    #[test]
    fn audio_and_thread_settings_are_applied() {
        let settings = ConversionSettings {
            audio_bitrate: 96_000,
            threads: Threads::Count(2),
            ..Default::default()
        };
        let args = args_for(&settings);
        assert_eq!(flag_value(&args, "-ab"), Some("96000"));
        assert_eq!(flag_value(&args, "-threads"), Some("2"));

        let auto = args_for(&ConversionSettings::default());
        assert_eq!(flag_value(&auto, "-threads"), Some("auto"));
    }

    #[tokio::test]
    async fn spawn_failure_maps_to_encode_error() {
        let args = args_for(&ConversionSettings::default());
        let err = spawn_encoder(Path::new("/nonexistent/ffmpeg_xyz_12345"), &args).unwrap_err();
        assert!(matches!(err, Error::Encode { .. }));
    }
}
