//! Extract step - decomposes the source into frames and audio with ffmpeg.

use crate::extraction::{count_frames, extract_frames_and_audio};
use crate::models::JobPhase;
use crate::orchestrator::errors::{JobError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, ExtractOutput, JobState};

/// Extract step producing the raw frame sequence and the audio artifact.
///
/// After the external call, the frame inventory is scanned: the contiguous
/// artifact count becomes the authoritative `total_frames`, replacing the
/// provisional probe count (a gap or an empty sequence aborts the job).
pub struct ExtractStep;

impl ExtractStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ExtractStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ExtractStep {
    fn name(&self) -> &str {
        "Extract"
    }

    fn phase(&self) -> JobPhase {
        JobPhase::Extracting
    }

    fn description(&self) -> &str {
        "Extract frame images and audio into the workspace"
    }

    fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.probe.is_none() {
            return Err(JobError::invalid_input(
                self.name(),
                "probe results missing",
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<()> {
        let probe = state
            .probe
            .ok_or_else(|| JobError::invalid_input(self.name(), "probe results missing"))?;

        ctx.send_progress(0, "Extracting frames");

        ctx.logger.command(&format!(
            "{} -i \"{}\" -vf fps={} \"{}\" -q:v 1 \"{}\"",
            ctx.ffmpeg(),
            ctx.spec.input_path.display(),
            probe.frame_rate,
            ctx.workspace.raw_frame_pattern().display(),
            ctx.workspace.audio_path().display()
        ));

        let output = extract_frames_and_audio(
            ctx.ffmpeg(),
            &ctx.spec.input_path,
            probe.frame_rate,
            &ctx.workspace,
        )?;

        for line in String::from_utf8_lossy(&output.stderr).lines() {
            ctx.logger.output_line(line, true);
        }

        let total_frames = count_frames(&ctx.workspace, probe.frame_count)?;

        if total_frames != probe.frame_count {
            ctx.logger.warn(&format!(
                "probe reported {} packets but {} frames were extracted; using {}",
                probe.frame_count, total_frames, total_frames
            ));
        }

        ctx.logger
            .info(&format!("extracted {} frames + audio", total_frames));

        state.extract = Some(ExtractOutput {
            total_frames,
            audio_path: ctx.workspace.audio_path(),
        });
        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let extract = state.extract.as_ref().ok_or_else(|| {
            JobError::invalid_output(self.name(), "extraction results not recorded")
        })?;

        if extract.total_frames == 0 {
            return Err(JobError::invalid_output(self.name(), "zero frames recorded"));
        }
        if !extract.audio_path.exists() {
            return Err(JobError::invalid_output(
                self.name(),
                format!("audio artifact missing: {}", extract.audio_path.display()),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::types::test_support::{make_context, simple_spec};

    #[test]
    fn extract_step_has_correct_name_and_phase() {
        let step = ExtractStep::new();
        assert_eq!(step.name(), "Extract");
        assert_eq!(step.phase(), JobPhase::Extracting);
    }

    #[test]
    fn requires_probe_results() {
        let (_root, ctx, _rx, _cancel) = make_context(simple_spec());
        let step = ExtractStep::new();
        let err = step
            .validate_input(&ctx, &JobState::new("test"))
            .unwrap_err();
        assert!(matches!(err, JobError::InvalidInput { .. }));
    }

    #[test]
    fn output_validation_requires_audio_on_disk() {
        let (_root, ctx, _rx, _cancel) = make_context(simple_spec());
        let step = ExtractStep::new();

        let mut state = JobState::new("test");
        state.extract = Some(ExtractOutput {
            total_frames: 10,
            audio_path: ctx.workspace.audio_path(),
        });

        // Audio file does not exist yet.
        assert!(step.validate_output(&ctx, &state).is_err());

        std::fs::write(ctx.workspace.audio_path(), b"aac").unwrap();
        step.validate_output(&ctx, &state).unwrap();
    }
}
