//! Pipeline step trait definition.

use crate::models::JobPhase;

use super::errors::StepResult;
use super::types::{Context, JobState};

/// Trait implemented by every pipeline step.
///
/// The pipeline runner calls these methods in order:
///
/// 1. `validate_input` - check preconditions before execution
/// 2. `execute` - perform the step's work and record results in `state`
/// 3. `validate_output` - verify the step produced valid output
///
/// Steps report progress and check for cancellation through the [`Context`].
pub trait PipelineStep: Send + Sync {
    /// Step name, used in logging and error context.
    fn name(&self) -> &str;

    /// Job phase the state machine enters while this step runs.
    fn phase(&self) -> JobPhase;

    /// Validate inputs before execution.
    fn validate_input(&self, ctx: &Context, state: &JobState) -> StepResult<()>;

    /// Execute the step's main work.
    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<()>;

    /// Validate outputs after execution.
    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()>;

    /// Human-readable description of what this step does.
    fn description(&self) -> &str {
        self.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockStep;

    impl PipelineStep for MockStep {
        fn name(&self) -> &str {
            "Mock"
        }

        fn phase(&self) -> JobPhase {
            JobPhase::Probing
        }

        fn validate_input(&self, _ctx: &Context, _state: &JobState) -> StepResult<()> {
            Ok(())
        }

        fn execute(&self, _ctx: &Context, _state: &mut JobState) -> StepResult<()> {
            Ok(())
        }

        fn validate_output(&self, _ctx: &Context, _state: &JobState) -> StepResult<()> {
            Ok(())
        }
    }

    #[test]
    fn step_trait_object_works() {
        let step: Box<dyn PipelineStep> = Box::new(MockStep);
        assert_eq!(step.name(), "Mock");
        assert_eq!(step.description(), "Mock");
        assert_eq!(step.phase(), JobPhase::Probing);
    }
}
