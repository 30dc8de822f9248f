use clap::Parser;
use pf_core::config::{ConversionSettings, DEFAULT_AUDIO_BITRATE_KBPS, DEFAULT_VIDEO_RATE};
use pf_core::Threads;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pocketforge")]
#[command(author, version, about = "Convert any video to a handheld-friendly H.264/AAC MP4")]
pub struct Cli {
    /// Video to convert
    #[arg(short, long)]
    pub input: PathBuf,

    /// Name of the converted video
    #[arg(short, long, default_value = "pocketforge.mp4")]
    pub output: PathBuf,

    /// Additional options for mplayer (eg -sid 1 or -aid 1), passed through
    /// to both decoders; must be enclosed in quotes
    #[arg(short, long)]
    pub mpopts: Option<String>,

    /// Audio bitrate in kBit/s
    #[arg(short, long, default_value_t = DEFAULT_AUDIO_BITRATE_KBPS)]
    pub abitrate: u32,

    /// Video bitrate in kBit/s; values of 51 or less are used as a
    /// constant-quality factor instead
    #[arg(short, long, default_value_t = DEFAULT_VIDEO_RATE)]
    pub vbitrate: u32,

    /// Use this many threads to encode, or "auto"
    #[arg(short, long, default_value = "auto")]
    pub threads: Threads,

    /// Overwrite the output file if it exists
    #[arg(short, long)]
    pub force_overwrite: bool,
}

impl Cli {
    /// The passthrough argv appended to both decoder command lines.
    pub fn passthrough(&self) -> Vec<String> {
        self.mpopts
            .as_deref()
            .map(|opts| opts.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Encode-side settings derived from the flags.
    pub fn settings(&self) -> ConversionSettings {
        ConversionSettings {
            audio_bitrate: self.abitrate * 1000,
            video_rate: self.vbitrate,
            threads: self.threads,
        }
    }
}
