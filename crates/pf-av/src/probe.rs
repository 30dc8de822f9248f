//! Source inspection via mplayer's `-identify` output.
//!
//! Runs mplayer with null audio/video outputs and `-frames 0` so nothing is
//! actually decoded, then extracts the video dimensions and aspect ratio
//! from the `KEY=value` lines the identify mode prints on stdout.

use pf_core::{Error, Result, SourceVideo};
use std::path::Path;
use tokio::process::Command;

/// Probe `input` with mplayer and return its video characteristics.
///
/// # Errors
///
/// - [`Error::ToolNotFound`] if the mplayer binary cannot be executed.
/// - [`Error::Probe`] if the identify output lacks the video dimensions.
pub async fn identify(mplayer: &Path, input: &Path) -> Result<SourceVideo> {
    tracing::debug!("identifying {}", input.display());

    let output = Command::new(mplayer)
        .args(["-ao", "null", "-vo", "null", "-frames", "0", "-identify"])
        .arg(input)
        .output()
        .await
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_not_found("mplayer")
            } else {
                Error::from(e)
            }
        })?;

    if !output.status.success() {
        tracing::debug!("mplayer -identify exited with {}", output.status);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_identify(&stdout)
}

/// First `KEY=value` line for `key`, if any.
fn identify_field<'a>(output: &'a str, key: &str) -> Option<&'a str> {
    output
        .lines()
        .find_map(|line| line.strip_prefix(key)?.strip_prefix('='))
}

fn parse_identify(output: &str) -> Result<SourceVideo> {
    let width = identify_field(output, "ID_VIDEO_WIDTH").and_then(|v| v.trim().parse::<u32>().ok());
    let height =
        identify_field(output, "ID_VIDEO_HEIGHT").and_then(|v| v.trim().parse::<u32>().ok());

    let (Some(width), Some(height)) = (width, height) else {
        return Err(Error::probe(
            "identify output did not contain the video dimensions",
        ));
    };

    // A missing, zero, or unparsable aspect is not an error; the planner
    // derives it from the dimensions instead.
    let aspect = identify_field(output, "ID_VIDEO_ASPECT")
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|a| *a > 0.0);

    Ok(SourceVideo {
        aspect,
        width,
        height,
    })
}
