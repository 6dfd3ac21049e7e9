//! Output formatting module for CLI

mod json;
mod terminal;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

use anyhow::Result;

use crate::rules::report::ComplianceReport;

/// Trait for rendering a compliance report
pub trait ReportRenderer {
    fn render(&self, report: &ComplianceReport) -> Result<String>;
}
