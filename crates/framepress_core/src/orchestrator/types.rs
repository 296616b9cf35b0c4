//! Core types for the orchestrator pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::logging::JobLogger;
use crate::models::{JobPhase, JobSpec};
use crate::probe::ProbeInfo;
use crate::progress::{EventSender, JobEvent, ProgressEvent};
use crate::workspace::Workspace;

use super::errors::StepResult;
use super::pipeline::CancelHandle;
use super::JobError;

/// Read-only context passed to pipeline steps.
///
/// Owns the job's workspace: when the context is dropped - normal return,
/// failure, or a panic unwinding through the worker - the workspace
/// directory goes with it. Mutable run-state goes in [`JobState`].
pub struct Context {
    /// Job specification (paths, compression level).
    pub spec: JobSpec,
    /// Application settings.
    pub settings: Settings,
    /// Job name, derived from the input file.
    pub job_name: String,
    /// Exclusively-owned scratch directory for this job.
    pub workspace: Workspace,
    /// Per-job logger.
    pub logger: Arc<JobLogger>,
    /// Sending half of the job event stream.
    events: EventSender,
    /// Cooperative cancellation flag shared with the job handle.
    cancel: CancelHandle,
}

impl Context {
    /// Create a new context for one job.
    pub fn new(
        spec: JobSpec,
        settings: Settings,
        workspace: Workspace,
        logger: Arc<JobLogger>,
        events: EventSender,
        cancel: CancelHandle,
    ) -> Self {
        let job_name = spec.job_name();
        Self {
            spec,
            settings,
            job_name,
            workspace,
            logger,
            events,
            cancel,
        }
    }

    /// The configured ffmpeg executable.
    pub fn ffmpeg(&self) -> &str {
        &self.settings.tools.ffmpeg
    }

    /// The configured ffprobe executable.
    pub fn ffprobe(&self) -> &str {
        &self.settings.tools.ffprobe
    }

    /// Emit a progress event to observers and the job log.
    ///
    /// Callers are responsible for keeping `percent` non-decreasing over
    /// the job's lifetime; the steps derive it from completed counts.
    pub fn send_progress(&self, percent: u8, label: impl Into<String>) {
        let label = label.into();
        self.logger.progress(percent, &label);
        // A disconnected receiver means nobody is watching; not an error.
        let _ = self
            .events
            .send(JobEvent::Progress(ProgressEvent::new(percent, label)));
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fail with [`JobError::Cancelled`] if cancellation was requested.
    pub fn check_cancelled(&self) -> StepResult<()> {
        if self.is_cancelled() {
            Err(JobError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Mutable job state accumulated by pipeline steps.
///
/// Write-once manifest: each step records its output in its own section
/// and never overwrites another step's results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobState {
    /// Job name (also the log file stem).
    pub job_name: String,
    /// When the job started.
    pub started_at: Option<String>,
    /// Current phase of the state machine.
    pub phase: JobPhase,
    /// Probe results (frame rate, provisional count).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<ProbeInfo>,
    /// Extraction results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractOutput>,
    /// Recompression results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recompress: Option<RecompressOutput>,
    /// Assembly results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assemble: Option<AssembleOutput>,
}

impl JobState {
    /// Create a fresh state for a named job, starting at `Idle`.
    pub fn new(job_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Total frame count driving the recompression loop.
    ///
    /// This is the reconciled count from extraction, not the provisional
    /// probe count.
    pub fn total_frames(&self) -> Option<u64> {
        self.extract.as_ref().map(|e| e.total_frames)
    }
}

/// Output from the Extract step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOutput {
    /// Number of contiguous frame artifacts actually produced.
    pub total_frames: u64,
    /// Path of the extracted audio artifact.
    pub audio_path: PathBuf,
}

/// Output from the Recompress step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecompressOutput {
    /// Number of frames recompressed (equals the extract total on success).
    pub frames_written: u64,
}

/// Output from the Assemble step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembleOutput {
    /// Path of the final output file.
    pub output_path: PathBuf,
    /// Command line that produced it, for the job log.
    pub command: String,
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::progress::JobEvent;

    #[test]
    fn job_state_starts_idle() {
        let state = JobState::new("test");
        assert_eq!(state.phase, JobPhase::Idle);
        assert!(state.probe.is_none());
        assert!(state.total_frames().is_none());
        assert!(state.started_at.is_some());
    }

    #[test]
    fn job_state_serializes() {
        let mut state = JobState::new("holiday");
        state.extract = Some(ExtractOutput {
            total_frames: 300,
            audio_path: PathBuf::from("audio.aac"),
        });
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"job_name\":\"holiday\""));
        assert!(json.contains("\"total_frames\":300"));
        assert_eq!(state.total_frames(), Some(300));
    }

    #[test]
    fn context_sends_progress_events() {
        let (_root, ctx, rx, _cancel) = make_context(simple_spec());

        ctx.send_progress(0, "Processing");
        ctx.send_progress(50, "Processing frame 150/300");

        match rx.try_recv().unwrap() {
            JobEvent::Progress(e) => {
                assert_eq!(e.percent, 0);
                assert_eq!(e.label, "Processing");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        match rx.try_recv().unwrap() {
            JobEvent::Progress(e) => assert_eq!(e.percent, 50),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn cancellation_flag_reaches_context() {
        let (_root, ctx, _rx, cancel) = make_context(simple_spec());

        assert!(ctx.check_cancelled().is_ok());
        cancel.cancel();
        assert!(ctx.is_cancelled());
        assert!(matches!(
            ctx.check_cancelled(),
            Err(JobError::Cancelled)
        ));
    }

    #[test]
    fn progress_to_disconnected_receiver_is_ignored() {
        let (_root, ctx, rx, _cancel) = make_context(simple_spec());
        drop(rx);
        // Must not panic or error.
        ctx.send_progress(10, "Processing");
    }
}
