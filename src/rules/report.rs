//! Findings and compliance reports
//!
//! Every check result is a [`Finding`] carrying a structured [`Rule`] variant;
//! the display id is derived deterministically from the variant so re-running
//! an evaluation on an unchanged snapshot yields the same id set. A
//! [`ComplianceReport`] aggregates findings with the percentage law
//! `round(100 * compliant / (compliant + issues))`, 0 when no checks ran.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The check a finding belongs to, with its subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum Rule {
    /// A file that must exist at the repository root
    RequiredFile {
        /// Required path
        path: String,
    },
    /// A folder that must contain at least one file
    RequiredFolder {
        /// Required path prefix
        path: String,
    },
    /// A workflow-file pattern that must match at least one path
    WorkflowPattern {
        /// The configured pattern
        pattern: String,
    },
    /// A level-2 heading required in the README
    ReadmeHeading {
        /// Required heading text
        heading: String,
    },
    /// Architecture-diagram heading plus image requirement
    ArchitectureDiagram {
        /// The configured heading
        heading: String,
    },
    /// At least one infrastructure file must exist
    InfraFilesPresent,
    /// A resource literal required in an infrastructure file
    InfraResource {
        /// The infra file inspected
        file: String,
        /// The required resource name
        resource: String,
    },
    /// Authentication posture of an infrastructure file
    InfraAuth {
        /// The infra file inspected
        file: String,
    },
    /// Auth-requiring resources with no detectable auth configuration
    AnonymousAccess {
        /// The infra file inspected
        file: String,
    },
    /// Root-level azure.yaml/azure.yml must exist
    DeploymentManifest,
    /// The manifest must define a top-level services key
    ManifestServices,
    /// The manifest must be parseable YAML
    ManifestWellFormed,
    /// The repository default branch must match the configured value
    DefaultBranch,
    /// A file whose content could not be fetched
    UnreadableFile {
        /// The unreadable path
        path: String,
    },
    /// Synthetic aggregate finding carrying the percentage and counts
    Summary,
}

impl Rule {
    /// Deterministic display id for this rule and subject
    pub fn id(&self) -> String {
        match self {
            Rule::RequiredFile { path } => format!("required-file-{}", slug(path)),
            Rule::RequiredFolder { path } => format!("required-folder-{}", slug(path)),
            Rule::WorkflowPattern { pattern } => format!("workflow-pattern-{}", slug(pattern)),
            Rule::ReadmeHeading { heading } => format!("readme-heading-{}", slug(heading)),
            Rule::ArchitectureDiagram { .. } => "readme-architecture-diagram".to_string(),
            Rule::InfraFilesPresent => "infra-files-present".to_string(),
            Rule::InfraResource { file, resource } => {
                format!("infra-resource-{}-{}", slug(file), slug(resource))
            }
            Rule::InfraAuth { file } => format!("infra-auth-{}", slug(file)),
            Rule::AnonymousAccess { file } => format!("infra-anonymous-access-{}", slug(file)),
            Rule::DeploymentManifest => "deployment-manifest".to_string(),
            Rule::ManifestServices => "deployment-manifest-services".to_string(),
            Rule::ManifestWellFormed => "deployment-manifest-wellformed".to_string(),
            Rule::DefaultBranch => "repository-default-branch".to_string(),
            Rule::UnreadableFile { path } => format!("unreadable-{}", slug(path)),
            Rule::Summary => "summary".to_string(),
        }
    }
}

fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_dash = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() || c == '.' {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash && !out.is_empty() {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_end_matches('-').to_string()
}

/// Severity of an issue finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Violation that blocks compliance
    Error,
    /// Degraded evidence, does not block compliance on its own
    Warning,
}

/// Whether a finding is a violation or a satisfied check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FindingKind {
    /// A violation
    Issue {
        /// Issue severity
        severity: Severity,
    },
    /// A satisfied check
    Compliant,
}

/// One evaluation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    /// Stable id derived from the rule and subject
    pub id: String,

    /// The rule that produced this finding
    #[serde(flatten)]
    pub rule: Rule,

    /// Issue or Compliant
    #[serde(flatten)]
    pub kind: FindingKind,

    /// Short human-readable message
    pub message: String,

    /// Longer context, empty when the message says it all
    #[serde(default)]
    pub detail: String,

    /// Evidence location for tooling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,

    /// Evidence excerpt for tooling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl Finding {
    /// Create an issue finding
    pub fn issue(rule: Rule, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            id: rule.id(),
            rule,
            kind: FindingKind::Issue { severity },
            message: message.into(),
            detail: String::new(),
            file_path: None,
            snippet: None,
        }
    }

    /// Create a compliant finding
    pub fn compliant(rule: Rule, message: impl Into<String>) -> Self {
        Self {
            id: rule.id(),
            rule,
            kind: FindingKind::Compliant,
            message: message.into(),
            detail: String::new(),
            file_path: None,
            snippet: None,
        }
    }

    /// Set the detail text
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Set the evidence file path
    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Set the evidence excerpt
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Whether this finding is a violation
    pub fn is_issue(&self) -> bool {
        matches!(self.kind, FindingKind::Issue { .. })
    }

    /// Issue severity, if this is an issue
    pub fn severity(&self) -> Option<Severity> {
        match self.kind {
            FindingKind::Issue { severity } => Some(severity),
            FindingKind::Compliant => None,
        }
    }
}

/// The full result of one evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Repository that was evaluated
    pub repository: String,

    /// Ruleset used
    pub ruleset: String,

    /// When the report was produced
    pub generated_at: DateTime<Utc>,

    /// Number of compliant findings (summary excluded)
    pub compliant_count: usize,

    /// Number of issue findings (summary excluded)
    pub issue_count: usize,

    /// `round(100 * compliant / (compliant + issues))`, 0 when no checks ran
    pub percentage: u8,

    findings: Vec<Finding>,
}

impl ComplianceReport {
    /// Build a report from rule findings, appending the summary finding
    pub fn new(
        repository: impl Into<String>,
        ruleset: impl Into<String>,
        mut findings: Vec<Finding>,
    ) -> Self {
        let compliant_count = findings.iter().filter(|f| !f.is_issue()).count();
        let issue_count = findings.len() - compliant_count;
        let percentage = compute_percentage(compliant_count, issue_count);

        findings.push(
            Finding::compliant(
                Rule::Summary,
                format!("Compliance: {}%", percentage),
            )
            .with_detail(format!(
                "{} compliant, {} issues",
                compliant_count, issue_count
            )),
        );

        Self {
            repository: repository.into(),
            ruleset: ruleset.into(),
            generated_at: Utc::now(),
            compliant_count,
            issue_count,
            percentage,
            findings,
        }
    }

    /// All findings, including the summary
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Per-rule findings, excluding the synthetic summary
    pub fn rule_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.rule != Rule::Summary)
    }

    /// Issue findings only
    pub fn issues(&self) -> impl Iterator<Item = &Finding> {
        self.rule_findings().filter(|f| f.is_issue())
    }

    /// Whether any error-severity issue was found
    pub fn has_errors(&self) -> bool {
        self.issues()
            .any(|f| f.severity() == Some(Severity::Error))
    }

    /// Whether any warning-severity issue was found
    pub fn has_warnings(&self) -> bool {
        self.issues()
            .any(|f| f.severity() == Some(Severity::Warning))
    }
}

/// Percentage law shared by the report and its tests
pub fn compute_percentage(compliant: usize, issues: usize) -> u8 {
    let total = compliant + issues;
    if total == 0 {
        return 0;
    }
    ((compliant as f64 / total as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rule_ids_are_stable() {
        let rule = Rule::RequiredFile {
            path: "README.md".to_string(),
        };
        assert_eq!(rule.id(), "required-file-readme.md");
        assert_eq!(rule.id(), rule.clone().id());

        let resource = Rule::InfraResource {
            file: "infra/main.bicep".to_string(),
            resource: "Microsoft.Storage/storageAccounts".to_string(),
        };
        assert_eq!(
            resource.id(),
            "infra-resource-infra-main.bicep-microsoft.storage-storageaccounts"
        );
    }

    #[test]
    fn test_percentage_law() {
        assert_eq!(compute_percentage(0, 0), 0);
        assert_eq!(compute_percentage(2, 3), 40);
        assert_eq!(compute_percentage(1, 2), 33);
        assert_eq!(compute_percentage(2, 1), 67);
        assert_eq!(compute_percentage(5, 0), 100);
        assert_eq!(compute_percentage(0, 5), 0);
    }

    #[test]
    fn test_report_appends_summary() {
        let findings = vec![
            Finding::compliant(
                Rule::RequiredFile {
                    path: "README.md".to_string(),
                },
                "README.md found",
            ),
            Finding::issue(Rule::DeploymentManifest, Severity::Error, "azure.yaml missing"),
        ];

        let report = ComplianceReport::new("demo", "standard", findings);
        assert_eq!(report.compliant_count, 1);
        assert_eq!(report.issue_count, 1);
        assert_eq!(report.percentage, 50);
        assert_eq!(report.findings().len(), 3);
        assert_eq!(report.rule_findings().count(), 2);
    }

    #[test]
    fn test_empty_report_percentage_is_zero() {
        let report = ComplianceReport::new("demo", "standard", Vec::new());
        assert_eq!(report.percentage, 0);
        assert_eq!(report.rule_findings().count(), 0);
    }

    #[test]
    fn test_finding_ids_unique_per_subject() {
        let a = Finding::issue(
            Rule::RequiredFile {
                path: "LICENSE".to_string(),
            },
            Severity::Error,
            "missing",
        );
        let b = Finding::issue(
            Rule::RequiredFile {
                path: "SECURITY.md".to_string(),
            },
            Severity::Error,
            "missing",
        );
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_finding_serializes_flat() {
        let finding = Finding::issue(
            Rule::DeploymentManifest,
            Severity::Error,
            "azure.yaml missing",
        );
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["kind"], "issue");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["rule"], "deployment-manifest");
        assert_eq!(json["id"], "deployment-manifest");
    }
}
