//! Rule evaluation engine

pub mod checks;
pub mod engine;
pub mod patterns;
pub mod report;

pub use engine::RuleEngine;
pub use report::{ComplianceReport, Finding, FindingKind, Rule, Severity};
