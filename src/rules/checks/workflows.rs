//! Workflow-file pattern checks

use regex::Regex;

use crate::error::{GatecheckError, RulesetError};
use crate::rules::report::{Finding, Rule, Severity};

use super::{CheckContext, CheckGroup};

/// Required workflow-file patterns
///
/// Patterns are evaluated independently; the first matching path wins for
/// each pattern, and one path may satisfy several patterns.
pub struct WorkflowsCheck;

#[async_trait::async_trait]
impl CheckGroup for WorkflowsCheck {
    fn name(&self) -> &'static str {
        "workflows"
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, GatecheckError> {
        let mut findings = Vec::new();

        for wp in &ctx.config.workflow_patterns {
            let re = Regex::new(&wp.pattern).map_err(|e| RulesetError::InvalidPattern {
                pattern: wp.pattern.clone(),
                source: e,
            })?;

            let rule = Rule::WorkflowPattern {
                pattern: wp.pattern.clone(),
            };

            match ctx.index.find_matching(&re) {
                Some(path) => findings.push(
                    Finding::compliant(rule, format!("Workflow present: {}", path))
                        .with_file_path(path),
                ),
                None => findings.push(
                    Finding::issue(rule, Severity::Error, wp.message.clone())
                        .with_detail(format!("No file path matches pattern '{}'.", wp.pattern)),
                ),
            }
        }

        Ok(findings)
    }
}
