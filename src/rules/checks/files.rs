//! Required file and folder checks

use crate::error::GatecheckError;
use crate::rules::report::{Finding, Rule, Severity};

use super::{CheckContext, CheckGroup};

/// Required files and folders from the ruleset
pub struct FilesCheck;

#[async_trait::async_trait]
impl CheckGroup for FilesCheck {
    fn name(&self) -> &'static str {
        "files"
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, GatecheckError> {
        let mut findings = Vec::new();

        for required in &ctx.config.required_files {
            let rule = Rule::RequiredFile {
                path: required.clone(),
            };
            match ctx.index.find_exact(required) {
                Some(actual) => findings.push(
                    Finding::compliant(rule, format!("{} is present", required))
                        .with_file_path(actual),
                ),
                None => findings.push(
                    Finding::issue(
                        rule,
                        Severity::Error,
                        format!("Missing required file: {}", required),
                    )
                    .with_detail(format!(
                        "Add {} at the repository root (matching is case-insensitive).",
                        required
                    )),
                ),
            }
        }

        for folder in &ctx.config.required_folders {
            let rule = Rule::RequiredFolder {
                path: folder.clone(),
            };
            let contained = ctx.index.under_folder(folder);
            if contained.is_empty() {
                findings.push(
                    Finding::issue(
                        rule,
                        Severity::Error,
                        format!("Missing required folder: {}", folder),
                    )
                    .with_detail(format!(
                        "The {} folder must exist and contain at least one file.",
                        folder
                    )),
                );
            } else {
                findings.push(
                    Finding::compliant(rule, format!("{} is present", folder))
                        .with_detail(format!("Contains {} file(s)", contained.len())),
                );
            }
        }

        Ok(findings)
    }
}
