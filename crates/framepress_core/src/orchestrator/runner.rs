//! Job runner: one worker thread and one event stream per job.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::Settings;
use crate::logging::JobLogger;
use crate::models::{JobPhase, JobSpec};
use crate::progress::{self, EventReceiver, EventSender, JobEvent};
use crate::workspace::Workspace;

use super::create_standard_pipeline;
use super::errors::JobError;
use super::pipeline::CancelHandle;
use super::types::{Context, JobState};

/// Handle to a running job.
///
/// Carries the receiving end of the job's event stream and a cancellation
/// handle. The stream ends with exactly one terminal event, after which the
/// worker hangs up.
pub struct JobHandle {
    events: EventReceiver,
    cancel: CancelHandle,
    thread: Option<JoinHandle<()>>,
}

impl JobHandle {
    /// The job's event stream.
    pub fn events(&self) -> &EventReceiver {
        &self.events
    }

    /// A cancellation handle for this job.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Request cooperative cancellation.
    ///
    /// The worker stops at the next step or frame boundary and the stream
    /// ends with [`JobEvent::Cancelled`].
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the worker thread to finish.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            // A worker panic already surfaced through the hung-up channel.
            let _ = thread.join();
        }
    }
}

/// Starts jobs, each on a fresh worker thread.
///
/// The runner itself is stateless apart from the settings it hands to each
/// job; handles are independent and a runner can start any number of jobs.
pub struct JobRunner {
    settings: Settings,
}

impl JobRunner {
    /// Create a runner with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start a job on a fresh worker thread.
    ///
    /// Returns immediately; progress and the terminal outcome arrive on the
    /// handle's event stream.
    pub fn start(&self, spec: JobSpec) -> JobHandle {
        let (tx, rx) = progress::channel();
        let cancel = CancelHandle::new();

        let settings = self.settings.clone();
        let worker_cancel = cancel.clone();
        let worker_tx = tx.clone();
        let thread = thread::Builder::new()
            .name(format!("job-{}", spec.job_name()))
            .spawn(move || run_job(settings, spec, worker_tx, worker_cancel));

        let thread = match thread {
            Ok(handle) => Some(handle),
            Err(e) => {
                // Spawn failure still ends the stream with a terminal event.
                tracing::error!("failed to spawn job worker: {}", e);
                let _ = tx.send(JobEvent::Failed {
                    error: JobError::setup(format!("failed to spawn job worker: {}", e)),
                });
                None
            }
        };

        JobHandle {
            events: rx,
            cancel,
            thread,
        }
    }
}

/// Worker entry point: run the job and send exactly one terminal event.
///
/// The terminal event is sent after `execute_job` returns, i.e. after the
/// job's context - and with it the workspace directory - is gone.
fn run_job(settings: Settings, spec: JobSpec, events: EventSender, cancel: CancelHandle) {
    let terminal = match execute_job(settings, spec, events.clone(), cancel) {
        Ok(output_path) => JobEvent::Completed { output_path },
        Err(JobError::Cancelled) => JobEvent::Cancelled,
        Err(error) => JobEvent::Failed { error },
    };
    // A disconnected receiver means nobody is watching; not an error.
    let _ = events.send(terminal);
}

/// Run one job through the standard pipeline.
///
/// Owns the context for the duration of the run; every return path drops it
/// and removes the workspace directory.
fn execute_job(
    settings: Settings,
    spec: JobSpec,
    events: EventSender,
    cancel: CancelHandle,
) -> Result<PathBuf, JobError> {
    let job_name = spec.job_name();

    let logger = JobLogger::new(
        &job_name,
        Path::new(&settings.paths.logs_folder),
        settings.log_config(),
    )
    .map_err(|e| JobError::setup(format!("failed to create job log: {}", e)))?;
    let logger = Arc::new(logger);

    let workspace = Workspace::acquire(Path::new(&settings.paths.temp_root))?;

    logger.section(&format!(
        "job '{}': {} -> {} (quality {})",
        job_name,
        spec.input_path.display(),
        spec.output_path.display(),
        spec.compression_level
    ));

    let ctx = Context::new(spec, settings, workspace, logger, events, cancel);
    let mut state = JobState::new(&job_name);

    match create_standard_pipeline().run(&ctx, &mut state) {
        Ok(()) => {
            let output_path = ctx.spec.output_path.clone();
            ctx.logger.flush();
            Ok(output_path)
        }
        Err(JobError::Cancelled) => {
            state.phase = JobPhase::Cancelled;
            ctx.logger.warn("job cancelled");
            ctx.logger.flush();
            Err(JobError::Cancelled)
        }
        Err(e) => {
            state.phase = JobPhase::Failed;
            ctx.logger.show_tail("error");
            ctx.logger.flush();
            Err(e)
        }
    }
}
