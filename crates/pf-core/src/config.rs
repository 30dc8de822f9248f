//! Conversion settings and planner bounds.
//!
//! Every knob defaults to the stock handheld profile so a caller that
//! changes nothing gets a working conversion. All types carry serde derives
//! so settings can be embedded in larger configurations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default audio bit rate in kbit/s.
pub const DEFAULT_AUDIO_BITRATE_KBPS: u32 = 112;

/// Default video rate. Below [`CRF_MAX`], so it selects constant quality.
pub const DEFAULT_VIDEO_RATE: u32 = 22;

/// Highest value of [`ConversionSettings::video_rate`] interpreted as a
/// constant-quality factor; anything above it is a bit rate in kbit/s.
pub const CRF_MAX: u32 = 51;

// ---------------------------------------------------------------------------
// PlanLimits
// ---------------------------------------------------------------------------

/// Bounds for the resolution planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanLimits {
    /// Base output width for widescreen sources.
    pub base_wide_width: u32,
    /// Base output width used when the widescreen height overshoots.
    pub base_narrow_width: u32,
    /// Maximum output height the device can display.
    pub max_height: u32,
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self {
            base_wide_width: 854,
            base_narrow_width: 640,
            max_height: 480,
        }
    }
}

// ---------------------------------------------------------------------------
// Threads
// ---------------------------------------------------------------------------

/// Encoder thread count: a fixed number or the encoder's own heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Threads {
    Auto,
    Count(u32),
}

impl fmt::Display for Threads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Count(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for Threads {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        match s.parse::<u32>() {
            Ok(0) => Err("thread count must be positive".to_string()),
            Ok(n) => Ok(Self::Count(n)),
            Err(_) => Err(format!("invalid thread count: {s}")),
        }
    }
}

impl TryFrom<String> for Threads {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Threads> for String {
    fn from(threads: Threads) -> Self {
        threads.to_string()
    }
}

// ---------------------------------------------------------------------------
// ConversionSettings
// ---------------------------------------------------------------------------

/// Encode-side settings for one conversion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// Audio bit rate in bit/s.
    pub audio_bitrate: u32,
    /// Video rate: kbit/s above [`CRF_MAX`], constant-quality factor at or
    /// below it.
    pub video_rate: u32,
    /// Encoder thread count.
    pub threads: Threads,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            audio_bitrate: DEFAULT_AUDIO_BITRATE_KBPS * 1000,
            video_rate: DEFAULT_VIDEO_RATE,
            threads: Threads::Auto,
        }
    }
}

impl ConversionSettings {
    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.audio_bitrate == 0 {
            warnings.push("audio_bitrate is 0; the encoder will pick its own".into());
        }
        if self.video_rate == 0 {
            warnings.push("video_rate 0 selects lossless quality and a very large output".into());
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_profile() {
        let settings = ConversionSettings::default();
        assert_eq!(settings.audio_bitrate, 112_000);
        assert_eq!(settings.video_rate, 22);
        assert_eq!(settings.threads, Threads::Auto);

        let limits = PlanLimits::default();
        assert_eq!(limits.base_wide_width, 854);
        assert_eq!(limits.base_narrow_width, 640);
        assert_eq!(limits.max_height, 480);
    }

    #[test]
    fn default_video_rate_is_quality_mode() {
        assert!(DEFAULT_VIDEO_RATE <= CRF_MAX);
    }

    #[test]
    fn threads_from_str() {
        assert_eq!("auto".parse::<Threads>().unwrap(), Threads::Auto);
        assert_eq!("AUTO".parse::<Threads>().unwrap(), Threads::Auto);
        assert_eq!("4".parse::<Threads>().unwrap(), Threads::Count(4));
        assert!("0".parse::<Threads>().is_err());
        assert!("many".parse::<Threads>().is_err());
    }

    #[test]
    fn threads_display_round_trips() {
        for threads in [Threads::Auto, Threads::Count(2)] {
            assert_eq!(threads.to_string().parse::<Threads>().unwrap(), threads);
        }
    }

    #[test]
    fn settings_serialization() {
        let settings = ConversionSettings {
            audio_bitrate: 96_000,
            video_rate: 800,
            threads: Threads::Count(2),
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"2\""));
        let back: ConversionSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.video_rate, 800);
        assert_eq!(back.threads, Threads::Count(2));
    }

    #[test]
    fn clean_settings_validate_without_warnings() {
        assert!(ConversionSettings::default().validate().is_empty());
        assert_eq!(
            ConversionSettings {
                audio_bitrate: 0,
                ..Default::default()
            }
            .validate()
            .len(),
            1
        );
    }
}
