//! README structural checks

use crate::error::GatecheckError;
use crate::rules::patterns::markdown::{extract_headings, Heading};
use crate::rules::report::{Finding, Rule, Severity};

use super::{CheckContext, CheckGroup};

/// README heading and architecture-diagram requirements
///
/// Only runs when the README exists; its absence is reported by the
/// required-files check.
pub struct ReadmeCheck;

#[async_trait::async_trait]
impl CheckGroup for ReadmeCheck {
    fn name(&self) -> &'static str {
        "readme"
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, GatecheckError> {
        let mut findings = Vec::new();

        let Some(requirements) = &ctx.config.readme else {
            return Ok(findings);
        };

        let Some(readme_path) = ctx.index.find_exact("README.md") else {
            return Ok(findings);
        };
        let readme_path = readme_path.to_string();

        let Some(content) = ctx.read_or_warn(&readme_path, &mut findings).await else {
            return Ok(findings);
        };

        let headings = extract_headings(&content);

        for required in &requirements.required_headings {
            let rule = Rule::ReadmeHeading {
                heading: required.clone(),
            };
            let found = headings
                .iter()
                .find(|h| h.level == 2 && h.text.eq_ignore_ascii_case(required));

            match found {
                Some(h) => findings.push(
                    Finding::compliant(rule, format!("README contains '## {}'", required))
                        .with_file_path(&readme_path)
                        .with_snippet(format!("{} {}", "#".repeat(h.level as usize), h.text)),
                ),
                None => findings.push(
                    Finding::issue(
                        rule,
                        Severity::Error,
                        format!("README is missing required heading: {}", required),
                    )
                    .with_detail(format!("Add a level-2 heading '## {}'.", required))
                    .with_file_path(&readme_path),
                ),
            }
        }

        if let Some(diagram) = &requirements.architecture_diagram {
            findings.push(check_diagram(&headings, diagram, &readme_path));
        }

        Ok(findings)
    }
}

fn check_diagram(
    headings: &[Heading],
    diagram: &crate::config::ArchitectureDiagram,
    readme_path: &str,
) -> Finding {
    let rule = Rule::ArchitectureDiagram {
        heading: diagram.heading.clone(),
    };

    let Some(heading) = headings
        .iter()
        .find(|h| h.text.eq_ignore_ascii_case(&diagram.heading))
    else {
        return Finding::issue(
            rule,
            Severity::Error,
            format!("README is missing the '{}' heading", diagram.heading),
        )
        .with_detail("Add the heading with an architecture diagram image below it.")
        .with_file_path(readme_path);
    };

    if diagram.requires_image && !heading.followed_by_image {
        return Finding::issue(
            rule,
            Severity::Error,
            format!(
                "No architecture diagram image under the '{}' heading",
                diagram.heading
            ),
        )
        .with_detail("Place an image directly below the heading.")
        .with_file_path(readme_path);
    }

    Finding::compliant(
        rule,
        format!("Architecture diagram present under '{}'", diagram.heading),
    )
    .with_file_path(readme_path)
}
