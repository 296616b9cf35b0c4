//! Source decomposition: frames and audio extraction.
//!
//! One ffmpeg invocation turns the source video into a numbered sequence of
//! frame images plus a single audio artifact, all inside the job workspace.
//! The probe's packet count is provisional, so after extraction the frame
//! inventory is scanned and the contiguous artifact count becomes the
//! authoritative total for the recompression loop.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Output;

use thiserror::Error;

use crate::models::FrameRate;
use crate::tools::{run_tool, ToolError};
use crate::workspace::Workspace;

/// Errors from the decompose step.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("source file not found: {0}")]
    FileNotFound(PathBuf),

    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Extraction ran but produced no frame images at all.
    #[error("no frames were extracted from the source")]
    NoFrames,

    /// The frame sequence is not contiguous from index 1.
    #[error("frame sequence has a gap: frame {missing} missing with {found} frames on disk")]
    MissingFrame { missing: u64, found: u64 },

    /// Extraction produced frames but no audio artifact.
    #[error("no audio artifact was extracted")]
    NoAudio,
}

/// Result type for extraction operations.
pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Build the ffmpeg argument list for the decompose call.
///
/// Frames are resampled to the probed rate so indices line up with the
/// constant-frame-rate reassembly; `-q:v 1` keeps the intermediate image
/// writer at maximum quality (the lossy step is the recompressor).
pub(crate) fn build_extract_args(
    input: &Path,
    frame_rate: FrameRate,
    workspace: &Workspace,
) -> Vec<OsString> {
    vec![
        "-i".into(),
        input.as_os_str().to_os_string(),
        "-vf".into(),
        format!("fps={}", frame_rate).into(),
        workspace.raw_frame_pattern().into_os_string(),
        "-q:v".into(),
        "1".into(),
        workspace.audio_path().into_os_string(),
    ]
}

/// Extract the frame sequence and audio artifact into the workspace.
///
/// Returns the raw process output so callers can forward ffmpeg's log
/// lines to the job logger.
pub fn extract_frames_and_audio(
    ffmpeg: &str,
    input: &Path,
    frame_rate: FrameRate,
    workspace: &Workspace,
) -> ExtractionResult<Output> {
    if !input.exists() {
        return Err(ExtractionError::FileNotFound(input.to_path_buf()));
    }

    let args = build_extract_args(input, frame_rate, workspace);
    let output = run_tool(ffmpeg, args)?;

    if !workspace.audio_path().exists() {
        return Err(ExtractionError::NoAudio);
    }

    tracing::info!(
        "extracted frames and audio from {} into {}",
        input.display(),
        workspace.path().display()
    );

    Ok(output)
}

/// Count the contiguous raw frame artifacts starting at index 1.
///
/// The scan walks the sequence until the first missing index, so the count
/// is exact even when the provisional probe count is far off. `expected`
/// only bounds the gap check: a frame existing between the first hole and
/// the probe count means the sequence has a gap, not an end.
pub fn count_frames(workspace: &Workspace, expected: u64) -> ExtractionResult<u64> {
    let mut found: u64 = 0;
    while workspace.raw_frame(found + 1).exists() {
        found += 1;
    }

    if found == 0 {
        return Err(ExtractionError::NoFrames);
    }

    for index in (found + 2)..=expected {
        if workspace.raw_frame(index).exists() {
            return Err(ExtractionError::MissingFrame {
                missing: found + 1,
                found,
            });
        }
    }

    Ok(found)
}
