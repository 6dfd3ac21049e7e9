//! Infrastructure-file checks

use crate::error::GatecheckError;
use crate::rules::patterns::auth::{contains_resource, detect_auth};
use crate::rules::report::{Finding, Rule, Severity};

use super::{CheckContext, CheckGroup};

/// Resource presence and authentication checks over infra files
pub struct InfraCheck;

#[async_trait::async_trait]
impl CheckGroup for InfraCheck {
    fn name(&self) -> &'static str {
        "infra"
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Finding>, GatecheckError> {
        let mut findings = Vec::new();
        let infra = &ctx.config.infra;

        let infra_files: Vec<String> = ctx
            .index
            .under_folder(&infra.folder)
            .into_iter()
            .filter(|p| {
                let lower = p.to_lowercase();
                infra
                    .extensions
                    .iter()
                    .any(|ext| lower.ends_with(&format!(".{}", ext.to_lowercase())))
            })
            .map(|p| p.to_string())
            .collect();

        if infra_files.is_empty() {
            findings.push(
                Finding::issue(
                    Rule::InfraFilesPresent,
                    Severity::Error,
                    format!(
                        "No infrastructure files ({}) found under {}/",
                        infra
                            .extensions
                            .iter()
                            .map(|e| format!(".{}", e))
                            .collect::<Vec<_>>()
                            .join(", "),
                        infra.folder
                    ),
                )
                .with_detail("Add infrastructure-as-code files so provisioning can be checked."),
            );
            return Ok(findings);
        }

        for file in &infra_files {
            let Some(content) = ctx.read_or_warn(file, &mut findings).await else {
                continue;
            };

            for resource in &infra.required_resources {
                let rule = Rule::InfraResource {
                    file: file.clone(),
                    resource: resource.clone(),
                };
                if contains_resource(&content, resource) {
                    findings.push(
                        Finding::compliant(rule, format!("{} references {}", file, resource))
                            .with_file_path(file),
                    );
                } else {
                    findings.push(
                        Finding::issue(
                            rule,
                            Severity::Error,
                            format!("{} does not reference required resource {}", file, resource),
                        )
                        .with_file_path(file),
                    );
                }
            }

            if infra.security.enabled {
                findings.extend(check_auth(ctx, file, &content));
            }
        }

        Ok(findings)
    }
}

/// Authentication heuristic for one infra file
///
/// Legacy indicators outrank a managed-identity declaration: a file that
/// declares an identity but still ships a connection string is flagged.
/// Key-vault secret references are the exception; with an identity declared
/// they are the intended access path and never count as legacy.
fn check_auth(ctx: &CheckContext<'_>, file: &str, content: &str) -> Vec<Finding> {
    let security = &ctx.config.infra.security;
    let profile = detect_auth(content);
    let mut findings = Vec::new();

    if security.detect_insecure_auth && !profile.legacy.is_empty() {
        let labels: Vec<&str> = profile.legacy.iter().map(|h| h.label).collect();
        findings.push(
            Finding::issue(
                Rule::InfraAuth { file: file.to_string() },
                Severity::Error,
                format!("{} uses legacy authentication: {}", file, labels.join(", ")),
            )
            .with_detail(
                "Replace key- and connection-string-based access with managed identity."
                    .to_string(),
            )
            .with_file_path(file)
            .with_snippet(profile.legacy[0].line.clone()),
        );
        return findings;
    }

    if profile.uses_managed_identity {
        findings.push(
            Finding::compliant(
                Rule::InfraAuth { file: file.to_string() },
                format!("{} uses managed identity", file),
            )
            .with_file_path(file),
        );
        return findings;
    }

    if security.check_anonymous_access && !profile.auth_resources.is_empty() {
        findings.push(
            Finding::issue(
                Rule::AnonymousAccess { file: file.to_string() },
                Severity::Error,
                format!(
                    "{} provisions auth-requiring resources ({}) with no detectable authentication",
                    file,
                    profile.auth_resources.join(", ")
                ),
            )
            .with_detail("Configure managed identity for these resources.".to_string())
            .with_file_path(file),
        );
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Preset, RulesetConfig};
    use crate::rules::checks::FileIndex;
    use crate::snapshot::{MemorySnapshot, RepoSnapshot};

    fn infra_config() -> RulesetConfig {
        let mut config = Preset::Minimal.ruleset();
        config.infra.security.enabled = true;
        config.infra.security.detect_insecure_auth = true;
        config.infra.security.check_anonymous_access = true;
        config.infra.required_resources =
            vec!["Microsoft.Storage/storageAccounts".to_string()];
        config
    }

    async fn run_check(config: &RulesetConfig, snapshot: &MemorySnapshot) -> Vec<Finding> {
        let index = FileIndex::new(snapshot.list_files().await.unwrap());
        let ctx = CheckContext {
            config,
            snapshot,
            index: &index,
        };
        InfraCheck.run(&ctx).await.unwrap()
    }

    #[tokio::test]
    async fn test_zero_infra_files_single_issue() {
        let config = infra_config();
        let snapshot = MemorySnapshot::new("demo").with_file("infra/readme.txt", "not infra");

        let findings = run_check(&config, &snapshot).await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id, "infra-files-present");
        assert!(findings[0].is_issue());
    }

    #[tokio::test]
    async fn test_missing_resource_per_file() {
        let config = infra_config();
        let snapshot = MemorySnapshot::new("demo")
            .with_file("infra/main.bicep", "param location string\n");

        let findings = run_check(&config, &snapshot).await;
        let resource = findings
            .iter()
            .find(|f| f.id.starts_with("infra-resource-"))
            .unwrap();
        assert!(resource.is_issue());
    }

    #[tokio::test]
    async fn test_managed_identity_compliant() {
        let config = infra_config();
        let snapshot = MemorySnapshot::new("demo").with_file(
            "infra/main.bicep",
            "resource sa 'Microsoft.Storage/storageAccounts@2023-01-01' = {\n\
             identity: {\n  type: 'SystemAssigned'\n }\n}",
        );

        let findings = run_check(&config, &snapshot).await;
        let auth = findings
            .iter()
            .find(|f| f.id == "infra-auth-infra-main.bicep")
            .unwrap();
        assert!(!auth.is_issue());
    }

    #[tokio::test]
    async fn test_secret_reference_with_identity_is_compliant() {
        let config = infra_config();
        let snapshot = MemorySnapshot::new("demo").with_file(
            "infra/main.bicep",
            "resource sa 'Microsoft.Storage/storageAccounts@2023-01-01' = {\n\
             identity: {\n  type: 'SystemAssigned'\n }\n}\n\
             var dbSecret = kv.getSecret('db-secret')\n",
        );

        let findings = run_check(&config, &snapshot).await;
        let auth = findings
            .iter()
            .find(|f| f.id == "infra-auth-infra-main.bicep")
            .unwrap();
        assert!(!auth.is_issue());
    }

    #[tokio::test]
    async fn test_legacy_auth_one_issue_listing_all_indicators() {
        let config = infra_config();
        let snapshot = MemorySnapshot::new("demo").with_file(
            "infra/main.bicep",
            "var cs = 'AccountKey=abc;SharedAccessKey=def'\n\
             var keys = listKeys(sa.id, '2022-09-01')\n\
             var url = 'https://x?sig=token'\n\
             resource sa 'Microsoft.Storage/storageAccounts@2023-01-01' = {}",
        );

        let findings = run_check(&config, &snapshot).await;
        let auth: Vec<_> = findings
            .iter()
            .filter(|f| f.id == "infra-auth-infra-main.bicep")
            .collect();
        assert_eq!(auth.len(), 1, "one issue per file, not per indicator");
        assert!(auth[0].is_issue());
        assert!(auth[0].message.contains("account key access"));
        assert!(auth[0].message.contains("SAS token"));
        assert!(auth[0].snippet.is_some());
    }

    #[tokio::test]
    async fn test_anonymous_access_issue_lists_resource_types() {
        let config = infra_config();
        let snapshot = MemorySnapshot::new("demo").with_file(
            "infra/main.bicep",
            "resource kv 'Microsoft.KeyVault/vaults@2023-07-01' = {}\n\
             resource sa 'Microsoft.Storage/storageAccounts@2023-01-01' = {}",
        );

        let findings = run_check(&config, &snapshot).await;
        let anon = findings
            .iter()
            .find(|f| f.id == "infra-anonymous-access-infra-main.bicep")
            .unwrap();
        assert!(anon.is_issue());
        assert!(anon.message.contains("Storage"));
        assert!(anon.message.contains("Key Vault"));
    }

    #[tokio::test]
    async fn test_plain_file_without_auth_resources_is_silent() {
        let config = infra_config();
        let snapshot = MemorySnapshot::new("demo").with_file(
            "infra/main.bicep",
            "param location string\nresource rg 'Microsoft.Resources/resourceGroups@2022-09-01' = {}",
        );

        let findings = run_check(&config, &snapshot).await;
        assert!(!findings
            .iter()
            .any(|f| f.id.starts_with("infra-auth") || f.id.starts_with("infra-anonymous")));
    }
}
