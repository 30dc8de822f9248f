//! Unified error type for the pocketforge pipeline.
//!
//! All crates funnel their failures into [`Error`], which carries enough
//! context for the CLI to derive a distinct process exit code via
//! [`Error::exit_code`]. Every failure is terminal for the job -- there is no
//! retry logic anywhere in this system.

use std::path::PathBuf;

use crate::media::StreamKind;

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type covering all failure modes in pocketforge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required external tool is not available.
    #[error("tool not found: {tool}; is it installed and in PATH?")]
    ToolNotFound {
        /// Name of the missing tool.
        tool: String,
    },

    /// The input file does not exist or is not a regular file.
    #[error("input file not found: {}", path.display())]
    InputNotFound {
        /// The path that was given.
        path: PathBuf,
    },

    /// The output file already exists and overwriting was not requested.
    #[error("output file {} already exists, force overwrite with -f", path.display())]
    OutputExists {
        /// The colliding output path.
        path: PathBuf,
    },

    /// The source video could not be identified.
    #[error("probe failed: {message}")]
    Probe {
        /// Human-readable description.
        message: String,
    },

    /// The source metadata is unusable (e.g. zero dimensions).
    #[error("invalid media: {message}")]
    InvalidMedia {
        /// Human-readable description.
        message: String,
    },

    /// A named pipe could not be created.
    #[error("failed to create pipe {}: {message}", path.display())]
    PipeCreation {
        /// The pipe path that could not be created.
        path: PathBuf,
        /// Human-readable description.
        message: String,
    },

    /// A decoder process failed to start.
    #[error("failed to launch {stream} decoder: {message}")]
    DecodeLaunch {
        /// Which elementary stream the decoder was for.
        stream: StreamKind,
        /// Human-readable description.
        message: String,
    },

    /// The encoder failed to start, crashed, or exited non-zero.
    #[error("encode failed: {message}")]
    Encode {
        /// Human-readable description.
        message: String,
    },

    /// The job was interrupted by a termination signal.
    #[error("interrupted")]
    Interrupted,

    /// An I/O operation failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Map this error to the process exit code the CLI reports.
    ///
    /// Each failure class gets a distinct code; 2 is left to clap for
    /// argument errors and 0 means success.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InputNotFound { .. } => 3,
            Error::OutputExists { .. } => 4,
            Error::ToolNotFound { .. } => 5,
            Error::Probe { .. } | Error::InvalidMedia { .. } => 6,
            Error::PipeCreation { .. } => 7,
            Error::DecodeLaunch { .. } => 8,
            Error::Encode { .. } => 9,
            Error::Interrupted => 130,
            Error::Io { .. } => 1,
        }
    }

    /// Convenience constructor for [`Error::ToolNotFound`].
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Error::ToolNotFound { tool: tool.into() }
    }

    /// Convenience constructor for [`Error::Probe`].
    pub fn probe(message: impl Into<String>) -> Self {
        Error::Probe {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::InvalidMedia`].
    pub fn invalid_media(message: impl Into<String>) -> Self {
        Error::InvalidMedia {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::PipeCreation`].
    pub fn pipe_creation(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::PipeCreation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::DecodeLaunch`].
    pub fn decode_launch(stream: StreamKind, message: impl Into<String>) -> Self {
        Error::DecodeLaunch {
            stream,
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Encode`].
    pub fn encode(message: impl Into<String>) -> Self {
        Error::Encode {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_not_found_display() {
        let err = Error::tool_not_found("mplayer");
        assert_eq!(
            err.to_string(),
            "tool not found: mplayer; is it installed and in PATH?"
        );
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn input_not_found_display() {
        let err = Error::InputNotFound {
            path: PathBuf::from("/no/such/file.avi"),
        };
        assert_eq!(err.to_string(), "input file not found: /no/such/file.avi");
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn output_exists_display() {
        let err = Error::OutputExists {
            path: PathBuf::from("out.mp4"),
        };
        assert!(err.to_string().contains("already exists"));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn probe_display() {
        let err = Error::probe("no video dimensions");
        assert_eq!(err.to_string(), "probe failed: no video dimensions");
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn invalid_media_shares_probe_code() {
        let err = Error::invalid_media("zero height");
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn pipe_creation_display() {
        let err = Error::pipe_creation("/tmp/stream1.wav", "permission denied");
        assert_eq!(
            err.to_string(),
            "failed to create pipe /tmp/stream1.wav: permission denied"
        );
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn decode_launch_display() {
        let err = Error::decode_launch(StreamKind::Video, "exec format error");
        assert_eq!(
            err.to_string(),
            "failed to launch video decoder: exec format error"
        );
        assert_eq!(err.exit_code(), 8);
    }

    #[test]
    fn encode_display() {
        let err = Error::encode("ffmpeg exited with exit status: 1");
        assert!(err.to_string().starts_with("encode failed"));
        assert_eq!(err.exit_code(), 9);
    }

    #[test]
    fn interrupted_uses_signal_convention() {
        assert_eq!(Error::Interrupted.exit_code(), 130);
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn exit_codes_are_distinct_per_class() {
        let errors = [
            Error::InputNotFound {
                path: PathBuf::new(),
            },
            Error::OutputExists {
                path: PathBuf::new(),
            },
            Error::tool_not_found("x"),
            Error::probe("x"),
            Error::pipe_creation("p", "x"),
            Error::decode_launch(StreamKind::Audio, "x"),
            Error::encode("x"),
        ];
        let mut codes: Vec<u8> = errors.iter().map(Error::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
