//! Recompress step - the per-frame quality conversion loop.

use crate::models::JobPhase;
use crate::orchestrator::errors::{JobError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, RecompressOutput};
use crate::recompress::recompress_frame;

/// Recompress step iterating the frame sequence in index order.
///
/// Frames are logically independent, but progress must be derived from a
/// strictly increasing completed-count so the observed percent sequence
/// stays monotonic. A single frame failure aborts the job immediately;
/// no partial frame set ever reaches the assemble step. Cancellation is
/// checked before every frame.
pub struct RecompressStep;

impl RecompressStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RecompressStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for RecompressStep {
    fn name(&self) -> &str {
        "Recompress"
    }

    fn phase(&self) -> JobPhase {
        JobPhase::Recompressing
    }

    fn description(&self) -> &str {
        "Recompress each frame at the job's quality level"
    }

    fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        match state.total_frames() {
            None => Err(JobError::invalid_input(
                self.name(),
                "extraction results missing",
            )),
            Some(0) => Err(JobError::invalid_input(self.name(), "no frames to process")),
            Some(_) => Ok(()),
        }
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<()> {
        let total = state
            .total_frames()
            .ok_or_else(|| JobError::invalid_input(self.name(), "extraction results missing"))?;
        let level = ctx.spec.compression_level;

        ctx.logger.info(&format!(
            "recompressing {} frames at quality level {}",
            total, level
        ));

        let mut completed: u64 = 0;
        for index in 1..=total {
            ctx.check_cancelled()?;

            recompress_frame(ctx.ffmpeg(), &ctx.workspace, index, level)?;

            completed += 1;
            let percent = (completed * 100 / total) as u8;
            ctx.send_progress(
                percent,
                format!("Processing frame {}/{}", completed, total),
            );
        }

        state.recompress = Some(RecompressOutput {
            frames_written: completed,
        });
        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let recompress = state.recompress.as_ref().ok_or_else(|| {
            JobError::invalid_output(self.name(), "recompression results not recorded")
        })?;

        if Some(recompress.frames_written) != state.total_frames() {
            return Err(JobError::invalid_output(
                self.name(),
                format!(
                    "wrote {} frames but {} were extracted",
                    recompress.frames_written,
                    state.total_frames().unwrap_or(0)
                ),
            ));
        }
        Ok(())
    }
}
