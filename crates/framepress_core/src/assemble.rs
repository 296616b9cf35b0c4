//! Reassembly: encode the recompressed frame sequence and mux the audio.
//!
//! The final ffmpeg call consumes the `processed_frame%08d.jpg` sequence at
//! the probed frame rate, encodes a constant-frame-rate libx264 stream with
//! a fixed quality target, copies the audio artifact verbatim, and writes
//! directly to the job's output path. Nothing upstream of this step ever
//! touches the output file.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Output;

use thiserror::Error;

use crate::config::EncoderSettings;
use crate::models::FrameRate;
use crate::tools::{run_tool, ToolError};
use crate::workspace::Workspace;

/// Errors from the reassembly step.
#[derive(Error, Debug)]
pub enum ReassemblyError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// ffmpeg exited zero but the output file is missing or empty.
    #[error("output file was not created: {0}")]
    OutputMissing(PathBuf),
}

/// Build the ffmpeg argument list for the encode/mux call.
pub(crate) fn build_assemble_args(
    workspace: &Workspace,
    frame_rate: FrameRate,
    encoder: &EncoderSettings,
    output: &Path,
) -> Vec<OsString> {
    vec![
        "-framerate".into(),
        frame_rate.to_string().into(),
        "-i".into(),
        workspace.processed_frame_pattern().into_os_string(),
        "-i".into(),
        workspace.audio_path().into_os_string(),
        "-c:v".into(),
        "libx264".into(),
        "-crf".into(),
        encoder.crf.to_string().into(),
        "-preset".into(),
        encoder.preset.clone().into(),
        "-c:a".into(),
        "copy".into(),
        output.as_os_str().to_os_string(),
    ]
}

/// Encode the recompressed frames and mux in the audio artifact.
///
/// Returns the raw process output so callers can forward ffmpeg's log
/// lines to the job logger.
pub fn combine_frames_and_audio(
    ffmpeg: &str,
    workspace: &Workspace,
    frame_rate: FrameRate,
    encoder: &EncoderSettings,
    output: &Path,
) -> Result<Output, ReassemblyError> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ReassemblyError::OutputDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let args = build_assemble_args(workspace, frame_rate, encoder, output);
    let result = run_tool(ffmpeg, args)?;

    let produced = fs::metadata(output).map(|m| m.len() > 0).unwrap_or(false);
    if !produced {
        return Err(ReassemblyError::OutputMissing(output.to_path_buf()));
    }

    tracing::info!("assembled output {}", output.display());
    Ok(result)
}
