//! Per-frame recompression.
//!
//! Each raw frame image is converted to a JPEG at the job's quality level
//! with one ffmpeg call. The quality scale is ffmpeg's `-q:v`: 1 is best
//! quality / largest file, 31 is worst / smallest, passed through unchanged.
//! Any single frame failure aborts the whole job; the iteration and
//! progress accounting live in the orchestrator's recompress step.

use std::ffi::OsString;

use thiserror::Error;

use crate::models::CompressionLevel;
use crate::tools::{run_tool, ToolError};
use crate::workspace::Workspace;

/// A single frame's recompression failure.
///
/// Carries the 1-based index of the failing frame; the job's terminal
/// failure event surfaces it to observers.
#[derive(Error, Debug)]
#[error("failed to recompress frame {frame_index}: {source}")]
pub struct FrameCompressionError {
    pub frame_index: u64,
    #[source]
    pub source: ToolError,
}

/// Build the ffmpeg argument list for one frame conversion.
pub(crate) fn build_recompress_args(
    workspace: &Workspace,
    index: u64,
    level: CompressionLevel,
) -> Vec<OsString> {
    vec![
        "-i".into(),
        workspace.raw_frame(index).into_os_string(),
        "-q:v".into(),
        level.to_string().into(),
        workspace.processed_frame(index).into_os_string(),
    ]
}

/// Recompress the raw frame at `index` into its processed counterpart.
pub fn recompress_frame(
    ffmpeg: &str,
    workspace: &Workspace,
    index: u64,
    level: CompressionLevel,
) -> Result<(), FrameCompressionError> {
    let args = build_recompress_args(workspace, index, level);

    run_tool(ffmpeg, args).map_err(|source| FrameCompressionError {
        frame_index: index,
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn recompress_args_match_tool_contract() {
        let root = TempDir::new().unwrap();
        let ws = Workspace::acquire(root.path()).unwrap();
        let level = CompressionLevel::new(17).unwrap();

        let args = build_recompress_args(&ws, 42, level);
        let rendered: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect();

        assert_eq!(rendered[0], "-i");
        assert!(rendered[1].ends_with("frame00000042.png"));
        assert_eq!(rendered[2], "-q:v");
        assert_eq!(rendered[3], "17");
        assert!(rendered[4].ends_with("processed_frame00000042.jpg"));
    }

    #[test]
    fn quality_value_is_passed_through_unchanged() {
        // 1 = best/largest, 31 = worst/smallest. The mapping is a fixed
        // external contract and must never be re-derived.
        let root = TempDir::new().unwrap();
        let ws = Workspace::acquire(root.path()).unwrap();

        for value in [1u8, 31] {
            let args = build_recompress_args(&ws, 1, CompressionLevel::new(value).unwrap());
            assert_eq!(args[3], OsString::from(value.to_string()));
        }
    }

    #[test]
    fn error_carries_frame_index() {
        let root = TempDir::new().unwrap();
        let ws = Workspace::acquire(root.path()).unwrap();

        let err = recompress_frame(
            "definitely-not-a-real-tool-xyz",
            &ws,
            150,
            CompressionLevel::best(),
        )
        .unwrap_err();

        assert_eq!(err.frame_index, 150);
        assert!(err.to_string().contains("frame 150"));
    }
}
