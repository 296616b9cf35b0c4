//! Core enums used throughout the crate.

use serde::{Deserialize, Serialize};

/// Phase of a job's lifecycle.
///
/// A job moves strictly forward: `Idle` through `Completed`, with `Failed`
/// reachable from every non-terminal phase and `Cancelled` a distinct
/// terminal outcome. A new job always starts fresh from `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPhase {
    #[default]
    Idle,
    Probing,
    Extracting,
    Recompressing,
    Reassembling,
    Completed,
    Failed,
    Cancelled,
}

impl JobPhase {
    /// Whether the job can make no further transitions from this phase.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobPhase::Completed | JobPhase::Failed | JobPhase::Cancelled
        )
    }
}

impl std::fmt::Display for JobPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobPhase::Idle => write!(f, "idle"),
            JobPhase::Probing => write!(f, "probing"),
            JobPhase::Extracting => write!(f, "extracting"),
            JobPhase::Recompressing => write!(f, "recompressing"),
            JobPhase::Reassembling => write!(f, "reassembling"),
            JobPhase::Completed => write!(f, "completed"),
            JobPhase::Failed => write!(f, "failed"),
            JobPhase::Cancelled => write!(f, "cancelled"),
        }
    }
}
