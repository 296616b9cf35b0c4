//! Framepress core - backend logic for the framepress video recompressor.
//!
//! This crate contains all pipeline logic with zero UI dependencies.
//! It decomposes a video into numbered frame images with ffmpeg, recompresses
//! each frame at a caller-supplied quality level, and reassembles the result
//! with the original audio track.
//!
//! # Architecture
//!
//! ```text
//! JobRunner (one worker thread per job)
//!     └── Pipeline
//!             ├── Step: Probe       (ffprobe: frame rate + frame count)
//!             ├── Step: Extract     (ffmpeg: frames + audio into workspace)
//!             ├── Step: Recompress  (ffmpeg: per-frame quality conversion)
//!             └── Step: Assemble    (ffmpeg: encode + mux to output)
//! ```
//!
//! All intermediate artifacts live in an exclusively-owned [`workspace::Workspace`]
//! that is removed on every exit path. Observers consume an ordered stream of
//! [`progress::JobEvent`] values from the handle returned by
//! [`orchestrator::JobRunner::start`].

pub mod assemble;
pub mod config;
pub mod extraction;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod probe;
pub mod progress;
pub mod recompress;
pub mod tools;
pub mod workspace;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
