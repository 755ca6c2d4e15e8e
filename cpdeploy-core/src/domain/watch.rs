//! Completion-watch semantics
//!
//! Both transports (polling the retrieve endpoint, subscribing to the event
//! stream) are normalized into the same [`WatchSignal`] before any decision
//! is made. This module owns that normalization plus the terminal outcomes;
//! it performs no I/O.

use crate::domain::deployment::{DeployId, DeploymentStatus};

/// Event name cPanel emits while the deployment task is still running.
pub const EVENT_PROCESSING: &str = "task_processing";
/// Event name for a deployment that finished successfully.
pub const EVENT_COMPLETE: &str = "task_complete";
/// Event name for a deployment that failed.
pub const EVENT_FAILED: &str = "task_failed";

/// One normalized status observation for the watched deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSignal {
    /// The deployment is queued or running; keep waiting.
    Processing,
    /// Success timestamp set (poll) or `task_complete` arrived (stream).
    Succeeded,
    /// Failure timestamp set (poll) or `task_failed` arrived (stream).
    Failed { log_path: Option<String> },
    /// The remote system no longer lists the deployment at all.
    Unknown,
}

/// Terminal result of a watch that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
    /// A success signal arrived.
    Completed,
    /// The deployment disappeared from the active list before any terminal
    /// signal. Upstream treats this as "nothing more to watch"; callers
    /// should surface it as a warning rather than a failure.
    Vanished,
}

impl WatchSignal {
    /// Classify one retrieve snapshot against the watched id.
    ///
    /// Entries for other identifiers are ignored. If a single entry somehow
    /// carries both terminal timestamps, failure wins.
    pub fn from_statuses(statuses: &[DeploymentStatus], deploy_id: &DeployId) -> WatchSignal {
        let Some(status) = statuses.iter().find(|s| &s.deploy_id == deploy_id) else {
            return WatchSignal::Unknown;
        };

        if status.timestamps.failed.is_some() {
            return WatchSignal::Failed {
                log_path: status.log_path.clone(),
            };
        }
        if status.timestamps.succeeded.is_some() {
            return WatchSignal::Succeeded;
        }
        WatchSignal::Processing
    }

    /// Map a stream event name. `None` for event types the watch has no
    /// reaction to (keep-alives, future additions).
    pub fn from_event_name(name: &str) -> Option<WatchSignal> {
        match name {
            EVENT_PROCESSING => Some(WatchSignal::Processing),
            EVENT_COMPLETE => Some(WatchSignal::Succeeded),
            EVENT_FAILED => Some(WatchSignal::Failed { log_path: None }),
            _ => None,
        }
    }

    /// Whether this signal ends the watch.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WatchSignal::Processing)
    }
}
