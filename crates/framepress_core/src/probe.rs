//! Source video probing using ffprobe.
//!
//! Queries the first video stream for its rational frame rate and
//! read-packet count. The packet count is provisional: the extraction step
//! re-validates it against the frame images actually produced.

use std::num::ParseIntError;
use std::path::Path;

use thiserror::Error;

use crate::models::{FrameRate, ParseFrameRateError};
use crate::tools::{run_tool, ToolError};

/// Errors from probing a source video.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Output was not a single `rate,count` line.
    #[error("unexpected ffprobe output, expected 'frame_rate,packet_count': {0:?}")]
    MalformedOutput(String),

    #[error("failed to parse frame rate: {0}")]
    FrameRate(#[from] ParseFrameRateError),

    #[error("failed to parse packet count {value:?}: {source}")]
    PacketCount {
        value: String,
        source: ParseIntError,
    },

    /// The first video stream contains no packets.
    #[error("source has no video packets")]
    EmptyStream,
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Frame rate and provisional frame count of the first video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProbeInfo {
    /// Exact rational frame rate (`r_frame_rate`).
    pub frame_rate: FrameRate,
    /// Number of packets read from the stream (`nb_read_packets`).
    pub frame_count: u64,
}

/// Probe a source video for its frame rate and frame count.
///
/// Runs ffprobe against the first video stream, requesting
/// `r_frame_rate` and `nb_read_packets` as headerless CSV.
pub fn probe_video(ffprobe: &str, input: &Path) -> ProbeResult<ProbeInfo> {
    tracing::debug!("probing {}", input.display());

    let output = run_tool(
        ffprobe,
        [
            "-v".as_ref(),
            "error".as_ref(),
            "-select_streams".as_ref(),
            "v:0".as_ref(),
            "-count_packets".as_ref(),
            "-show_entries".as_ref(),
            "stream=r_frame_rate,nb_read_packets".as_ref(),
            "-of".as_ref(),
            "csv=p=0".as_ref(),
            input.as_os_str(),
        ],
    )?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_probe_output(&stdout)
}

/// Parse ffprobe's `csv=p=0` output line into a [`ProbeInfo`].
///
/// Expects exactly one non-empty line of the form `30000/1001,300`.
/// The frame rate is split and parsed as explicit integers; the output is
/// never handed to any kind of expression evaluator.
fn parse_probe_output(stdout: &str) -> ProbeResult<ProbeInfo> {
    let line = stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| ProbeError::MalformedOutput(stdout.to_string()))?;

    let mut fields = line.split(',');
    let (rate_str, count_str) = match (fields.next(), fields.next(), fields.next()) {
        (Some(rate), Some(count), None) => (rate, count),
        _ => return Err(ProbeError::MalformedOutput(line.to_string())),
    };

    let frame_rate: FrameRate = rate_str.parse()?;

    let frame_count: u64 = count_str
        .trim()
        .parse()
        .map_err(|source| ProbeError::PacketCount {
            value: count_str.to_string(),
            source,
        })?;

    if frame_count == 0 {
        return Err(ProbeError::EmptyStream);
    }

    Ok(ProbeInfo {
        frame_rate,
        frame_count,
    })
}
