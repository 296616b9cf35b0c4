//! Pipeline orchestrator for running one recompression job.
//!
//! A job is a fixed sequence of steps, each of which validates its inputs,
//! performs one stage of the pipeline, and validates its outputs:
//!
//! ```text
//! Pipeline
//!     ├── Step: Probe       -> frame rate + provisional frame count
//!     ├── Step: Extract     -> frame images + audio artifact
//!     ├── Step: Recompress  -> per-frame quality conversion
//!     └── Step: Assemble    -> final encode/mux to output_path
//! ```
//!
//! [`JobRunner::start`] spawns one fresh worker thread per job and returns a
//! [`JobHandle`] carrying the event receiver and a cancellation handle.
//! Cancellation is cooperative: the flag is checked at every step boundary
//! and before every frame.

mod errors;
mod pipeline;
mod runner;
mod step;
pub mod steps;
mod types;

pub use errors::{JobError, StepResult};
pub use pipeline::{CancelHandle, Pipeline};
pub use runner::{JobHandle, JobRunner};
pub use step::PipelineStep;
pub use steps::{AssembleStep, ExtractStep, ProbeStep, RecompressStep};
pub use types::{AssembleOutput, Context, ExtractOutput, JobState, RecompressOutput};

/// Create the standard four-step pipeline in execution order.
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(ProbeStep::new())
        .with_step(ExtractStep::new())
        .with_step(RecompressStep::new())
        .with_step(AssembleStep::new())
}
