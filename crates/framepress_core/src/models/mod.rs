//! Data models for framepress.
//!
//! This module contains the core data structures used throughout the crate:
//! - Job specification (input, output, compression level)
//! - The exact rational frame rate
//! - The job phase state machine

mod enums;
mod jobs;

pub use enums::JobPhase;
pub use jobs::{
    CompressionLevel, FrameRate, InvalidCompressionLevel, JobSpec, ParseFrameRateError,
};
