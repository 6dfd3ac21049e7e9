//! Rule evaluation engine
//!
//! `evaluate` is deterministic: for a fixed ruleset and a fixed snapshot it
//! always yields the same finding set and percentage. The file list is
//! fetched once and indexed; checks run in a fixed order; file-read failures
//! degrade to warning findings rather than aborting the evaluation.

use tracing::{debug, info, span, Level};

use crate::config::RulesetConfig;
use crate::error::GatecheckError;
use crate::snapshot::RepoSnapshot;

use super::checks::{
    deployment::DeploymentCheck, files::FilesCheck, infra::InfraCheck, readme::ReadmeCheck,
    workflows::WorkflowsCheck, CheckContext, CheckGroup, FileIndex,
};
use super::report::ComplianceReport;

/// Rule evaluation engine
///
/// Holds no cross-invocation state; every call is independent and may run
/// fully in parallel with others.
pub struct RuleEngine {
    config: RulesetConfig,
}

impl RuleEngine {
    /// Create an engine for the given ruleset
    pub fn new(config: RulesetConfig) -> Self {
        Self { config }
    }

    /// Evaluate a repository snapshot against the ruleset
    pub async fn evaluate(
        &self,
        snapshot: &dyn RepoSnapshot,
    ) -> Result<ComplianceReport, GatecheckError> {
        let repository = snapshot.name();
        info!(repository = %repository, ruleset = %self.config.name, "Starting evaluation");

        let paths = snapshot.list_files().await?;
        let index = FileIndex::new(paths);
        debug!(files = index.len(), "Indexed repository file list");

        let ctx = CheckContext {
            config: &self.config,
            snapshot,
            index: &index,
        };

        let groups: Vec<Box<dyn CheckGroup>> = vec![
            Box::new(FilesCheck),
            Box::new(WorkflowsCheck),
            Box::new(ReadmeCheck),
            Box::new(InfraCheck),
            Box::new(DeploymentCheck),
        ];

        let mut findings = Vec::new();
        for group in groups {
            let group_name = group.name();
            let span = span!(Level::INFO, "check", group = group_name, repository = %repository);
            let _guard = span.enter();

            let group_findings = group.run(&ctx).await?;
            debug!(
                group = group_name,
                findings_count = group_findings.len(),
                "Check group completed"
            );
            findings.extend(group_findings);
        }

        let report = ComplianceReport::new(repository, self.config.name.clone(), findings);
        info!(
            compliant = report.compliant_count,
            issues = report.issue_count,
            percentage = report.percentage,
            "Evaluation complete"
        );

        Ok(report)
    }
}
