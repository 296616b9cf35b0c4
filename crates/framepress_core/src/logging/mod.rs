//! Per-job logging.
//!
//! Each job writes to its own log file under the configured logs folder.
//! Progress lines are filtered to step intervals in compact mode, and the
//! last lines of external-tool output are kept in a tail buffer so an error
//! can be diagnosed without full verbose logging.

mod job_logger;
mod types;

pub use job_logger::JobLogger;
pub use types::{LogConfig, LogLevel, MessagePrefix};
