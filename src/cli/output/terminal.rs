//! Terminal output formatting with colors

use anyhow::Result;
use colored::Colorize;

use super::ReportRenderer;
use crate::rules::report::{ComplianceReport, Finding, Severity};

pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn format_header(&self, report: &ComplianceReport) -> String {
        format!(
            r#"
{} v{}

{} {}
{} {}
"#,
            "gatecheck".cyan().bold(),
            env!("CARGO_PKG_VERSION"),
            "Repository:".dimmed(),
            report.repository.white().bold(),
            "Ruleset:".dimmed(),
            report.ruleset.yellow()
        )
    }

    fn format_findings(&self, report: &ComplianceReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{}\n{}\n\n",
            "━".repeat(50).dimmed(),
            "  FINDINGS".bold()
        ));

        let errors: Vec<_> = report
            .issues()
            .filter(|f| f.severity() == Some(Severity::Error))
            .collect();
        if !errors.is_empty() {
            output.push_str(&format!("{} ({})\n", "✗ ERRORS".red().bold(), errors.len()));
            for finding in errors {
                output.push_str(&self.format_finding(finding));
            }
            output.push('\n');
        }

        let warnings: Vec<_> = report
            .issues()
            .filter(|f| f.severity() == Some(Severity::Warning))
            .collect();
        if !warnings.is_empty() {
            output.push_str(&format!(
                "{} ({})\n",
                "⚠ WARNINGS".yellow().bold(),
                warnings.len()
            ));
            for finding in warnings {
                output.push_str(&self.format_finding(finding));
            }
            output.push('\n');
        }

        let compliant: Vec<_> = report.rule_findings().filter(|f| !f.is_issue()).collect();
        if !compliant.is_empty() {
            output.push_str(&format!(
                "{} ({})\n",
                "✓ COMPLIANT".green().bold(),
                compliant.len()
            ));
            for finding in compliant {
                output.push_str(&self.format_finding(finding));
            }
            output.push('\n');
        }

        output
    }

    fn format_finding(&self, finding: &Finding) -> String {
        let mut output = format!(
            "  {} [{}] {}\n",
            "•".dimmed(),
            finding.id.cyan(),
            finding.message
        );

        if let Some(path) = &finding.file_path {
            output.push_str(&format!("    {} {}\n", "└─".dimmed(), path.dimmed()));
        }
        if let Some(snippet) = &finding.snippet {
            output.push_str(&format!("    {} {}\n", "└─".dimmed(), snippet.dimmed()));
        }

        output
    }

    fn format_summary(&self, report: &ComplianceReport) -> String {
        let percentage = format!("{}%", report.percentage);
        let colored_percentage = if report.percentage == 100 {
            percentage.green().bold()
        } else if report.percentage >= 70 {
            percentage.yellow().bold()
        } else {
            percentage.red().bold()
        };

        format!(
            "\n{}\n  Compliance: {} ({} compliant, {} issues)\n",
            "━".repeat(50).dimmed(),
            colored_percentage,
            report.compliant_count,
            report.issue_count
        )
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for TerminalOutput {
    fn render(&self, report: &ComplianceReport) -> Result<String> {
        let mut output = String::new();
        output.push_str(&self.format_header(report));
        output.push_str(&self.format_findings(report));
        output.push_str(&self.format_summary(report));
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::report::{Finding, Rule};

    #[test]
    fn test_render_contains_counts_and_percentage() {
        let findings = vec![
            Finding::compliant(
                Rule::RequiredFile {
                    path: "README.md".to_string(),
                },
                "README.md found",
            ),
            Finding::issue(
                Rule::DeploymentManifest,
                Severity::Error,
                "azure.yaml missing",
            ),
        ];
        let report = ComplianceReport::new("demo", "standard", findings);

        let rendered = TerminalOutput::new().render(&report).unwrap();
        assert!(rendered.contains("demo"));
        assert!(rendered.contains("standard"));
        assert!(rendered.contains("50%"));
        assert!(rendered.contains("azure.yaml missing"));
    }
}
