//! Validation orchestrator
//!
//! Owns the lifecycle of validation runs: trigger the remote workflow,
//! discover the remote run id by correlation, poll under a bounded policy,
//! and honor cancellation requests. The state machine itself is a pure
//! transition function in [`state`]; [`runner`] wires it to a CI provider
//! and a poll schedule.

pub mod discovery;
pub mod runner;
pub mod state;

pub use runner::{CancelOutcome, Orchestrator, PollPolicy, RunStatus, StatusKind};
pub use state::{transition, RunEvent, RunState};
