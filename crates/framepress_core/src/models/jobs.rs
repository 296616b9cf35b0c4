//! Job-related data structures (spec, frame rate, compression level).

use std::num::ParseIntError;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Specification for one recompression job.
///
/// Immutable for the duration of the run. Each job gets its own fresh
/// workspace and state; a spec is never reused by a running job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Source video file.
    pub input_path: PathBuf,
    /// Destination video file. Written only by the final assemble step.
    pub output_path: PathBuf,
    /// Per-frame recompression quality.
    pub compression_level: CompressionLevel,
}

impl JobSpec {
    /// Create a new job spec.
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        compression_level: CompressionLevel,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            compression_level,
        }
    }

    /// Human-readable job name derived from the input file name.
    pub fn job_name(&self) -> String {
        self.input_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "job".to_string())
    }
}

/// Error for an out-of-range compression level.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("compression level {0} is out of range (must be 1-31)")]
pub struct InvalidCompressionLevel(pub u8);

/// Validated per-frame quality level in `1..=31`.
///
/// The scale is ffmpeg's `-q:v` quality scale and is inverted:
/// 1 is best quality / largest output, 31 is worst quality / smallest
/// output. The value is passed to the encoder unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 31;

    /// Create a compression level, rejecting values outside `1..=31`.
    pub fn new(value: u8) -> Result<Self, InvalidCompressionLevel> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidCompressionLevel(value))
        }
    }

    /// Best quality (largest output).
    pub fn best() -> Self {
        Self(Self::MIN)
    }

    /// The raw quality value.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for CompressionLevel {
    type Error = InvalidCompressionLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CompressionLevel> for u8 {
    fn from(level: CompressionLevel) -> u8 {
        level.0
    }
}

impl std::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error from parsing a rational frame rate string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseFrameRateError {
    #[error("frame rate '{0}' is not a 'num/den' rational")]
    Malformed(String),
    #[error("frame rate numerator '{value}' is not an integer: {source}")]
    Numerator { value: String, source: ParseIntError },
    #[error("frame rate denominator '{value}' is not an integer: {source}")]
    Denominator { value: String, source: ParseIntError },
    #[error("frame rate must be positive, got {0}")]
    Zero(String),
}

/// Exact rational frame rate (e.g. `30000/1001` for NTSC).
///
/// Parsed from an explicit numerator/denominator pair. The textual form
/// produced by `Display` is used verbatim in ffmpeg arguments, so the
/// rational is never collapsed to a float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRate {
    pub num: u32,
    pub den: u32,
}

impl FrameRate {
    /// Create a frame rate from a numerator/denominator pair.
    ///
    /// Both must be positive.
    pub fn new(num: u32, den: u32) -> Result<Self, ParseFrameRateError> {
        if num == 0 || den == 0 {
            return Err(ParseFrameRateError::Zero(format!("{}/{}", num, den)));
        }
        Ok(Self { num, den })
    }

    /// Approximate frames per second as a float (for display only).
    pub fn as_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl FromStr for FrameRate {
    type Err = ParseFrameRateError;

    /// Parse `"30000/1001"` or a bare integer like `"25"` (denominator 1).
    ///
    /// This is a strict split-and-parse: anything that is not one or two
    /// decimal integers separated by a single `/` is rejected. The string
    /// is never evaluated as an expression.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseFrameRateError::Malformed(s.to_string()));
        }

        let (num_str, den_str) = match s.split_once('/') {
            Some((n, d)) => (n, d),
            None => (s, "1"),
        };

        let num: u32 = num_str
            .parse()
            .map_err(|source| ParseFrameRateError::Numerator {
                value: num_str.to_string(),
                source,
            })?;
        let den: u32 = den_str
            .parse()
            .map_err(|source| ParseFrameRateError::Denominator {
                value: den_str.to_string(),
                source,
            })?;

        FrameRate::new(num, den)
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}
