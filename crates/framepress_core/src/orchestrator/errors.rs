//! Job-level error taxonomy.
//!
//! Every external-call failure aborts the job immediately - no retries, no
//! partial degradation. The variant identifies the failing stage, and the
//! terminal failure event delivers it to observers unchanged.

use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::probe::ProbeError;
use crate::recompress::FrameCompressionError;
use crate::assemble::ReassemblyError;
use crate::workspace::WorkspaceError;

/// Terminal error of a failed job.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("probe failed: {0}")]
    Probe(#[from] ProbeError),

    #[error("frame extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    FrameCompression(#[from] FrameCompressionError),

    #[error("reassembly failed: {0}")]
    Reassembly(#[from] ReassemblyError),

    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    /// The job was cancelled at a step or frame boundary.
    #[error("job was cancelled")]
    Cancelled,

    /// Job setup failed before the pipeline could start (log file, etc.).
    #[error("job setup failed: {message}")]
    Setup { message: String },

    /// A step precondition was not met.
    #[error("step '{step}' input validation failed: {message}")]
    InvalidInput { step: String, message: String },

    /// A step completed but did not produce what the next step needs.
    #[error("step '{step}' output validation failed: {message}")]
    InvalidOutput { step: String, message: String },
}

impl JobError {
    /// Short stable name of the error kind, for observers and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::Probe(_) => "probe",
            JobError::Extraction(_) => "extraction",
            JobError::FrameCompression(_) => "frame_compression",
            JobError::Reassembly(_) => "reassembly",
            JobError::Workspace(_) => "workspace",
            JobError::Cancelled => "cancelled",
            JobError::Setup { .. } => "setup",
            JobError::InvalidInput { .. } => "invalid_input",
            JobError::InvalidOutput { .. } => "invalid_output",
        }
    }

    /// The failing frame index, when the failure was per-frame.
    pub fn frame_index(&self) -> Option<u64> {
        match self {
            JobError::FrameCompression(e) => Some(e.frame_index),
            _ => None,
        }
    }

    /// Create an input validation error.
    pub fn invalid_input(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            step: step.into(),
            message: message.into(),
        }
    }

    /// Create an output validation error.
    pub fn invalid_output(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOutput {
            step: step.into(),
            message: message.into(),
        }
    }

    /// Create a setup error.
    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup {
            message: message.into(),
        }
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, JobError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolError;

    #[test]
    fn frame_compression_error_carries_index() {
        let err = JobError::from(FrameCompressionError {
            frame_index: 150,
            source: ToolError::Failed {
                tool: "ffmpeg".to_string(),
                exit_code: 1,
                stderr: "corrupt frame".to_string(),
            },
        });

        assert_eq!(err.kind(), "frame_compression");
        assert_eq!(err.frame_index(), Some(150));
        let msg = err.to_string();
        assert!(msg.contains("frame 150"));
    }

    #[test]
    fn non_frame_errors_have_no_index() {
        assert_eq!(JobError::Cancelled.frame_index(), None);
        assert_eq!(JobError::Cancelled.kind(), "cancelled");
    }

    #[test]
    fn validation_errors_name_the_step() {
        let err = JobError::invalid_input("Extract", "probe results missing");
        assert!(err.to_string().contains("Extract"));
        assert!(err.to_string().contains("probe results missing"));
    }
}
