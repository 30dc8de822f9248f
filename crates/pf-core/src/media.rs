//! Media domain types and the output resolution planner.
//!
//! The planner is a pure function: given the probed source characteristics
//! and the configured bounds it picks the output width from a two-tier base
//! (widescreen first, narrower 4:3 base as the fallback) and snaps the
//! height to the codec's 16-pixel macroblock grid.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::PlanLimits;
use crate::error::{Error, Result};

/// Macroblock size the encoder requires frame heights to align to.
pub const MACROBLOCK: u32 = 16;

// ---------------------------------------------------------------------------
// StreamKind
// ---------------------------------------------------------------------------

/// Which elementary stream a pipe or decoder carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Audio,
    Video,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

// ---------------------------------------------------------------------------
// SourceVideo
// ---------------------------------------------------------------------------

/// Characteristics of the source video, as reported by the probe.
///
/// `aspect` is `None` when the container reported no aspect ratio (or a zero
/// or garbage one); [`plan`] derives it from the pixel dimensions in that
/// case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceVideo {
    /// Display aspect ratio, if the source declared a positive one.
    pub aspect: Option<f64>,
    /// Coded width in pixels.
    pub width: u32,
    /// Coded height in pixels.
    pub height: u32,
}

// ---------------------------------------------------------------------------
// TargetResolution
// ---------------------------------------------------------------------------

/// The planned output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetResolution {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels, a multiple of [`MACROBLOCK`].
    pub height: u32,
}

impl fmt::Display for TargetResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Height for `base_width` at `aspect`, rounded to the nearest macroblock.
fn snap_height(base_width: u32, aspect: f64) -> u32 {
    ((base_width as f64 / aspect / MACROBLOCK as f64).round() as u32) * MACROBLOCK
}

/// Plan the output resolution for a source.
///
/// Tries the widescreen base width first; if the resulting height exceeds
/// `max_height` the narrower base width is used instead. There is no third
/// tier: a sufficiently tall aspect ratio can still exceed `max_height`
/// after the fallback, which callers accept as-is.
///
/// # Errors
///
/// Returns [`Error::InvalidMedia`] when no aspect ratio was reported and the
/// pixel dimensions cannot supply one (zero width or height), or when the
/// snapped height degenerates to 0.
pub fn plan(source: &SourceVideo, limits: &PlanLimits) -> Result<TargetResolution> {
    let aspect = match source.aspect {
        Some(a) if a > 0.0 => a,
        _ => {
            if source.width == 0 || source.height == 0 {
                return Err(Error::invalid_media(format!(
                    "cannot derive aspect ratio from {}x{} source",
                    source.width, source.height
                )));
            }
            source.width as f64 / source.height as f64
        }
    };

    let mut width = limits.base_wide_width;
    let mut height = snap_height(width, aspect);
    if height > limits.max_height {
        width = limits.base_narrow_width;
        height = snap_height(width, aspect);
    }

    if height == 0 {
        return Err(Error::invalid_media(format!(
            "aspect ratio {aspect} yields a zero-height output"
        )));
    }

    Ok(TargetResolution { width, height })
}
