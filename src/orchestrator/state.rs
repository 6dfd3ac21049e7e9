//! Validation run state machine
//!
//! Terminal states absorb every event. Cancellation is a request, not an
//! abort: `Cancelling` resolves only when the remote system reports the
//! run's true outcome, and a successful remote conclusion outranks a local
//! cancel intent.

use serde::{Deserialize, Serialize};

use crate::ci::RunConclusion;

/// Lifecycle state of a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunState {
    /// Created, workflow not yet triggered
    Starting,
    /// Workflow triggered, remote run not yet observed
    Triggered,
    /// Remote run observed and not yet finished
    Running,
    /// Cancellation requested, awaiting remote confirmation
    Cancelling,
    /// Remote run ended cancelled
    Cancelled,
    /// Remote run ended successfully
    CompletedSuccess,
    /// Remote run ended unsuccessfully
    CompletedFailure,
    /// Unrecoverable failure (trigger error, invalid credential)
    Error,
    /// Attempts ceiling reached without a terminal remote status
    Timeout,
}

impl RunState {
    /// Whether no further transition can occur
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Cancelled
                | RunState::CompletedSuccess
                | RunState::CompletedFailure
                | RunState::Error
                | RunState::Timeout
        )
    }
}

/// An observation or request driving the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    /// The trigger call succeeded
    Triggered,
    /// The remote run was discovered or observed still executing
    RemoteRunning,
    /// The remote run reported a completed status
    RemoteCompleted {
        /// The remote conclusion
        conclusion: RunConclusion,
        /// Whether a cancellation was requested before completion
        cancel_requested: bool,
    },
    /// A cancellation was requested and sent
    CancelRequested,
    /// The remote system rejected or ignored the cancellation
    CancelRejected,
    /// The poll attempts ceiling was exceeded
    AttemptsExhausted,
    /// An unrecoverable failure occurred
    Failed,
}

/// Pure transition function
pub fn transition(state: RunState, event: RunEvent) -> RunState {
    if state.is_terminal() {
        return state;
    }

    match event {
        RunEvent::Failed => RunState::Error,
        RunEvent::AttemptsExhausted => RunState::Timeout,
        RunEvent::Triggered => RunState::Triggered,
        RunEvent::RemoteRunning => match state {
            // A rejected or pending cancel keeps waiting for the remote outcome
            RunState::Cancelling => RunState::Cancelling,
            _ => RunState::Running,
        },
        RunEvent::CancelRequested => RunState::Cancelling,
        RunEvent::CancelRejected => match state {
            RunState::Cancelling => RunState::Running,
            other => other,
        },
        RunEvent::RemoteCompleted {
            conclusion,
            cancel_requested,
        } => match conclusion {
            RunConclusion::Success => RunState::CompletedSuccess,
            RunConclusion::Cancelled => RunState::Cancelled,
            _ if cancel_requested => RunState::Cancelled,
            _ => RunState::CompletedFailure,
        },
    }
}
