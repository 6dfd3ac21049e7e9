//! Deployment manifest and repository settings checks

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::GatecheckError;
use crate::rules::report::{Finding, Rule, Severity};

use super::{CheckContext, CheckGroup};

lazy_static! {
    // Top-level services key, line-anchored
    static ref SERVICES_KEY: Regex = Regex::new(r"(?im)^services\s*:").unwrap();
}

/// azure.yaml presence/content and default-branch pin
pub struct DeploymentCheck;

#[async_trait::async_trait]
impl CheckGroup for DeploymentCheck {
    fn name(&self) -> &'static str {
        "deployment"
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, GatecheckError> {
        let mut findings = Vec::new();

        if ctx.config.deployment.require_manifest {
            self.check_manifest(ctx, &mut findings).await;
        }

        if let Some(expected) = &ctx.config.repository.default_branch {
            self.check_default_branch(ctx, expected, &mut findings).await;
        }

        Ok(findings)
    }
}

impl DeploymentCheck {
    async fn check_manifest(&self, ctx: &CheckContext<'_>, findings: &mut Vec<Finding>) {
        let manifest = ctx
            .index
            .find_exact("azure.yaml")
            .or_else(|| ctx.index.find_exact("azure.yml"));

        let Some(path) = manifest else {
            findings.push(
                Finding::issue(
                    Rule::DeploymentManifest,
                    Severity::Error,
                    "Missing azure.yaml deployment manifest",
                )
                .with_detail("azd templates require a root-level azure.yaml or azure.yml."),
            );
            return;
        };
        let path = path.to_string();

        findings.push(
            Finding::compliant(Rule::DeploymentManifest, format!("{} is present", path))
                .with_file_path(&path),
        );

        if !ctx.config.deployment.must_define_services {
            return;
        }

        let Some(content) = ctx.read_or_warn(&path, findings).await else {
            return;
        };

        if SERVICES_KEY.is_match(&content) {
            findings.push(
                Finding::compliant(
                    Rule::ManifestServices,
                    format!("{} defines services", path),
                )
                .with_file_path(&path),
            );
        } else {
            findings.push(
                Finding::issue(
                    Rule::ManifestServices,
                    Severity::Error,
                    format!("{} does not define a top-level services key", path),
                )
                .with_detail("azd cannot deploy a template whose manifest declares no services.")
                .with_file_path(&path),
            );
        }

        if serde_yaml::from_str::<serde_yaml::Value>(&content).is_err() {
            findings.push(
                Finding::issue(
                    Rule::ManifestWellFormed,
                    Severity::Warning,
                    format!("{} is not valid YAML", path),
                )
                .with_file_path(&path),
            );
        }
    }

    async fn check_default_branch(
        &self,
        ctx: &CheckContext<'_>,
        expected: &str,
        findings: &mut Vec<Finding>,
    ) {
        match ctx.snapshot.default_branch().await {
            Ok(Some(actual)) => {
                let actual = actual.trim();
                let expected = expected.trim();
                if actual == expected {
                    findings.push(Finding::compliant(
                        Rule::DefaultBranch,
                        format!("Default branch is '{}'", actual),
                    ));
                } else {
                    findings.push(
                        Finding::issue(
                            Rule::DefaultBranch,
                            Severity::Error,
                            format!(
                                "Default branch is '{}', expected '{}'",
                                actual, expected
                            ),
                        )
                        .with_detail(format!(
                            "Rename the default branch to '{}' in the repository settings.",
                            expected
                        )),
                    );
                }
            }
            Ok(None) => {
                tracing::debug!("Snapshot provider reports no default branch; check skipped");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not determine default branch");
                findings.push(
                    Finding::issue(
                        Rule::DefaultBranch,
                        Severity::Warning,
                        "Could not determine the repository default branch",
                    )
                    .with_detail(e.to_string()),
                );
            }
        }
    }
}
