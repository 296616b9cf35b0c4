//! Assemble step - encodes the recompressed sequence and muxes the audio.

use crate::assemble::combine_frames_and_audio;
use crate::models::JobPhase;
use crate::orchestrator::errors::{JobError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{AssembleOutput, Context, JobState};

/// Assemble step writing the final output file.
///
/// This is the only step that touches `output_path`, so no upstream
/// failure can ever leave a partially-written output behind.
pub struct AssembleStep;

impl AssembleStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AssembleStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for AssembleStep {
    fn name(&self) -> &str {
        "Assemble"
    }

    fn phase(&self) -> JobPhase {
        JobPhase::Reassembling
    }

    fn description(&self) -> &str {
        "Encode recompressed frames and mux the original audio"
    }

    fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.probe.is_none() {
            return Err(JobError::invalid_input(self.name(), "probe results missing"));
        }
        if state.recompress.is_none() {
            return Err(JobError::invalid_input(
                self.name(),
                "recompression results missing",
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<()> {
        let probe = state
            .probe
            .ok_or_else(|| JobError::invalid_input(self.name(), "probe results missing"))?;
        let encoder = &ctx.settings.encoder;
        let output_path = &ctx.spec.output_path;

        ctx.send_progress(100, "Combining frames");

        let command = format!(
            "{} -framerate {} -i \"{}\" -i \"{}\" -c:v libx264 -crf {} -preset {} -c:a copy \"{}\"",
            ctx.ffmpeg(),
            probe.frame_rate,
            ctx.workspace.processed_frame_pattern().display(),
            ctx.workspace.audio_path().display(),
            encoder.crf,
            encoder.preset,
            output_path.display()
        );
        ctx.logger.command(&command);

        let output = combine_frames_and_audio(
            ctx.ffmpeg(),
            &ctx.workspace,
            probe.frame_rate,
            encoder,
            output_path,
        )?;

        for line in String::from_utf8_lossy(&output.stderr).lines() {
            ctx.logger.output_line(line, true);
        }

        state.assemble = Some(AssembleOutput {
            output_path: output_path.clone(),
            command,
        });

        ctx.logger
            .success(&format!("wrote {}", output_path.display()));
        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let assemble = state.assemble.as_ref().ok_or_else(|| {
            JobError::invalid_output(self.name(), "assembly results not recorded")
        })?;

        let non_empty = std::fs::metadata(&assemble.output_path)
            .map(|m| m.len() > 0)
            .unwrap_or(false);
        if !non_empty {
            return Err(JobError::invalid_output(
                self.name(),
                format!(
                    "output file missing or empty: {}",
                    assemble.output_path.display()
                ),
            ));
        }
        Ok(())
    }
}
