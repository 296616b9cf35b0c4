//! Job event stream consumed by observers.
//!
//! The orchestrator is the single producer; observers hold the receiving
//! end. The sequence is ordered and monotonic in percent, and exactly one
//! terminal event ([`JobEvent::Completed`], [`JobEvent::Failed`] or
//! [`JobEvent::Cancelled`]) ends the stream - the worker hangs up the
//! channel right after sending it.

use std::path::PathBuf;

use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::orchestrator::JobError;

/// One progress update.
///
/// Over a job's lifetime the observed `percent` sequence is non-decreasing,
/// starts at 0 and reaches exactly 100 before a successful completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Completion percentage in `0..=100`.
    pub percent: u8,
    /// Short stage label, e.g. `Processing frame 150/300`.
    pub label: String,
}

impl ProgressEvent {
    pub fn new(percent: u8, label: impl Into<String>) -> Self {
        debug_assert!(percent <= 100);
        Self {
            percent,
            label: label.into(),
        }
    }
}

/// Message on the job event stream.
#[derive(Debug)]
pub enum JobEvent {
    /// Intermediate progress update.
    Progress(ProgressEvent),
    /// Terminal: the job finished and the output file exists.
    Completed { output_path: PathBuf },
    /// Terminal: the job aborted with the given error.
    Failed { error: JobError },
    /// Terminal: the job was cancelled cooperatively.
    Cancelled,
}

impl JobEvent {
    /// Whether no further events can follow this one.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobEvent::Progress(_))
    }
}

/// Sending half of the job event stream (held by the worker).
pub type EventSender = Sender<JobEvent>;

/// Receiving half of the job event stream (held by observers).
pub type EventReceiver = Receiver<JobEvent>;

/// Create a fresh event stream for one job.
pub fn channel() -> (EventSender, EventReceiver) {
    unbounded()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_events_are_not_terminal() {
        assert!(!JobEvent::Progress(ProgressEvent::new(50, "halfway")).is_terminal());
        assert!(JobEvent::Completed {
            output_path: PathBuf::from("out.mp4")
        }
        .is_terminal());
        assert!(JobEvent::Cancelled.is_terminal());
    }

    #[test]
    fn channel_delivers_in_order() {
        let (tx, rx) = channel();
        tx.send(JobEvent::Progress(ProgressEvent::new(0, "Processing")))
            .unwrap();
        tx.send(JobEvent::Progress(ProgressEvent::new(100, "Combining frames")))
            .unwrap();
        drop(tx);

        let events: Vec<JobEvent> = rx.iter().collect();
        assert_eq!(events.len(), 2);
        match (&events[0], &events[1]) {
            (JobEvent::Progress(a), JobEvent::Progress(b)) => {
                assert_eq!(a.percent, 0);
                assert_eq!(b.percent, 100);
            }
            _ => panic!("expected progress events"),
        }
    }

    #[test]
    fn progress_event_serializes() {
        let event = ProgressEvent::new(42, "Processing frame 126/300");
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"percent\":42"));
    }
}
