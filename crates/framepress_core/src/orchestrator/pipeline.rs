//! Pipeline runner that executes steps in sequence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::JobPhase;

use super::errors::{JobError, StepResult};
use super::step::PipelineStep;
use super::types::{Context, JobState};

/// Handle for cancelling a running job.
///
/// Cloneable; all clones share one flag. The pipeline checks it at every
/// step boundary and the recompress step checks it before every frame.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Create a fresh, unset handle.
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation at the next boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Pipeline that runs a sequence of steps against one job.
pub struct Pipeline {
    steps: Vec<Box<dyn PipelineStep>>,
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step (builder pattern).
    pub fn with_step<S: PipelineStep + 'static>(mut self, step: S) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Number of steps in the pipeline.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Step names in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run the pipeline to completion.
    ///
    /// For each step, in order: check cancellation, validate input, enter
    /// the step's phase, execute, validate output. The first error aborts
    /// the run and `state.phase` records where it stopped; the caller maps
    /// the error to the terminal `Failed`/`Cancelled` phase and event.
    ///
    /// On success `state.phase` is `Completed`.
    pub fn run(&self, ctx: &Context, state: &mut JobState) -> StepResult<()> {
        for step in &self.steps {
            let step_name = step.name();

            if ctx.is_cancelled() {
                ctx.logger
                    .warn(&format!("cancelled before step '{}'", step_name));
                return Err(JobError::Cancelled);
            }

            ctx.logger.phase(step_name);

            step.validate_input(ctx, state).inspect_err(|e| {
                ctx.logger.error(&format!("input validation failed: {}", e));
            })?;

            state.phase = step.phase();

            step.execute(ctx, state).inspect_err(|e| {
                ctx.logger.error(&format!("{} failed: {}", step_name, e));
            })?;

            step.validate_output(ctx, state).inspect_err(|e| {
                ctx.logger
                    .error(&format!("output validation failed: {}", e));
            })?;

            ctx.logger.success(&format!("{} completed", step_name));
        }

        state.phase = JobPhase::Completed;
        ctx.logger.success("pipeline completed");
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
