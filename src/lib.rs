//! gatecheck Library
//!
//! This crate provides the core functionality for auditing azd template
//! repositories against a governance ruleset and validating their
//! deployability through GitHub Actions.
//!
//! The two halves are independent: [`rules`] evaluates a repository
//! snapshot deterministically and offline, while [`orchestrator`] drives a
//! remote validation workflow through trigger, discovery, polling, and
//! cancellation.

pub mod ci;
pub mod cli;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod repo;
pub mod rules;
pub mod snapshot;
pub mod utils;

pub use error::GatecheckError;
