//! JSON output formatting

use anyhow::Result;
use serde::Serialize;

use super::ReportRenderer;
use crate::rules::report::ComplianceReport;

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    #[serde(flatten)]
    report: &'a ComplianceReport,
}

impl ReportRenderer for JsonOutput {
    fn render(&self, report: &ComplianceReport) -> Result<String> {
        let output = JsonReport {
            version: env!("CARGO_PKG_VERSION"),
            report,
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::report::{Finding, Rule, Severity};

    #[test]
    fn test_render_is_valid_json_with_findings() {
        let findings = vec![Finding::issue(
            Rule::DeploymentManifest,
            Severity::Error,
            "azure.yaml missing",
        )];
        let report = ComplianceReport::new("demo", "standard", findings);

        let rendered = JsonOutput::new().render(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["repository"], "demo");
        assert_eq!(value["ruleset"], "standard");
        assert_eq!(value["percentage"], 0);
        assert!(value["findings"].as_array().unwrap().len() >= 2);
    }
}
