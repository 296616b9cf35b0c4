//! Probe step - queries frame rate and frame count with ffprobe.

use crate::models::JobPhase;
use crate::orchestrator::errors::{JobError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState};
use crate::probe::probe_video;

/// Probe step for reading the first video stream's metadata.
///
/// Records the rational frame rate and the provisional packet count in
/// `state.probe`. The count is only trusted after the extract step
/// reconciles it against the artifacts on disk.
pub struct ProbeStep;

impl ProbeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProbeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ProbeStep {
    fn name(&self) -> &str {
        "Probe"
    }

    fn phase(&self) -> JobPhase {
        JobPhase::Probing
    }

    fn description(&self) -> &str {
        "Read frame rate and frame count with ffprobe"
    }

    fn validate_input(&self, ctx: &Context, _state: &JobState) -> StepResult<()> {
        if !ctx.spec.input_path.exists() {
            return Err(JobError::invalid_input(
                self.name(),
                format!("input file not found: {}", ctx.spec.input_path.display()),
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<()> {
        ctx.send_progress(0, "Processing");

        ctx.logger.command(&format!(
            "{} -v error -select_streams v:0 -count_packets \
             -show_entries stream=r_frame_rate,nb_read_packets -of csv=p=0 \"{}\"",
            ctx.ffprobe(),
            ctx.spec.input_path.display()
        ));

        let info = probe_video(ctx.ffprobe(), &ctx.spec.input_path)?;

        ctx.logger.info(&format!(
            "source: {} fps ({}), {} packets",
            info.frame_rate,
            format_fps(info.frame_rate.as_f64()),
            info.frame_count
        ));

        state.probe = Some(info);
        Ok(())
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.probe.is_none() {
            return Err(JobError::invalid_output(
                self.name(),
                "probe results not recorded",
            ));
        }
        Ok(())
    }
}

fn format_fps(fps: f64) -> String {
    format!("{:.3}", fps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::types::test_support::{make_context, simple_spec};

    #[test]
    fn probe_step_has_correct_name_and_phase() {
        let step = ProbeStep::new();
        assert_eq!(step.name(), "Probe");
        assert_eq!(step.phase(), JobPhase::Probing);
    }

    #[test]
    fn missing_input_fails_validation() {
        let (_root, ctx, _rx, _cancel) = make_context(simple_spec());
        let step = ProbeStep::new();
        let err = step
            .validate_input(&ctx, &JobState::new("test"))
            .unwrap_err();
        assert!(matches!(err, JobError::InvalidInput { .. }));
    }

    #[test]
    fn missing_probe_output_fails_validation() {
        let (_root, ctx, _rx, _cancel) = make_context(simple_spec());
        let step = ProbeStep::new();
        let err = step
            .validate_output(&ctx, &JobState::new("test"))
            .unwrap_err();
        assert!(matches!(err, JobError::InvalidOutput { .. }));
    }
}
