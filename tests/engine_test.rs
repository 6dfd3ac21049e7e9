//! Integration tests for the rule evaluation engine

use gatecheck::config::{
    DeploymentConfig, InfraChecks, Preset, ReadmeRequirements, RepositoryConfig, RulesetConfig,
    SecurityBestPractices,
};
use gatecheck::rules::engine::RuleEngine;
use gatecheck::rules::report::{compute_percentage, Rule, Severity};
use gatecheck::snapshot::MemorySnapshot;
use pretty_assertions::assert_eq;

/// Ruleset exercising one check of each kind, without the auth heuristics
fn worked_example_ruleset() -> RulesetConfig {
    RulesetConfig {
        name: "worked-example".to_string(),
        required_files: vec!["README.md".to_string()],
        required_folders: vec!["infra".to_string()],
        workflow_patterns: Vec::new(),
        readme: Some(ReadmeRequirements {
            required_headings: vec!["Getting Started".to_string()],
            architecture_diagram: None,
        }),
        infra: InfraChecks {
            required_resources: vec!["Microsoft.Storage/storageAccounts".to_string()],
            security: SecurityBestPractices {
                enabled: false,
                detect_insecure_auth: false,
                check_anonymous_access: false,
            },
            ..InfraChecks::default()
        },
        deployment: DeploymentConfig {
            require_manifest: true,
            must_define_services: false,
        },
        repository: RepositoryConfig::default(),
    }
}

/// README present but missing its heading, infra file missing its resource,
/// and no deployment manifest: 2 compliant vs 3 issues is 40%.
#[tokio::test]
async fn test_partially_compliant_repository_scores_forty_percent() {
    let snapshot = MemorySnapshot::new("partial")
        .with_file("README.md", "# Partial\n## Features\n")
        .with_file("infra/main.bicep", "param location string\n");

    let engine = RuleEngine::new(worked_example_ruleset());
    let report = engine.evaluate(&snapshot).await.unwrap();

    assert_eq!(report.compliant_count, 2);
    assert_eq!(report.issue_count, 3);
    assert_eq!(report.percentage, 40);
    assert!(report.has_errors());
}

#[tokio::test]
async fn test_fully_compliant_repository_scores_one_hundred_percent() {
    let snapshot = MemorySnapshot::new("complete")
        .with_file("README.md", "# Complete\n## Getting Started\n")
        .with_file(
            "infra/main.bicep",
            "resource sa 'Microsoft.Storage/storageAccounts@2023-01-01' = {}\n",
        )
        .with_file("azure.yaml", "name: complete\n");

    let engine = RuleEngine::new(worked_example_ruleset());
    let report = engine.evaluate(&snapshot).await.unwrap();

    assert_eq!(report.issue_count, 0);
    assert_eq!(report.percentage, 100);
    assert!(!report.has_errors());
    assert!(!report.has_warnings());
}

#[tokio::test]
async fn test_issue_findings_carry_error_severity_and_stable_ids() {
    let snapshot = MemorySnapshot::new("partial")
        .with_file("README.md", "# Partial\n")
        .with_file("infra/main.bicep", "param location string\n");

    let engine = RuleEngine::new(worked_example_ruleset());
    let report = engine.evaluate(&snapshot).await.unwrap();

    let ids: Vec<&str> = report.issues().map(|f| f.id.as_str()).collect();
    assert!(ids.contains(&"readme-heading-getting-started"));
    assert!(ids.contains(&"infra-resource-infra-main.bicep-microsoft.storage-storageaccounts"));
    assert!(ids.contains(&"deployment-manifest"));
    assert!(report
        .issues()
        .all(|f| f.severity() == Some(Severity::Error)));
}

#[tokio::test]
async fn test_repeated_evaluation_is_deterministic() {
    let snapshot = MemorySnapshot::new("partial")
        .with_file("README.md", "# Partial\n## Features\n")
        .with_file("infra/main.bicep", "param location string\n");
    let engine = RuleEngine::new(worked_example_ruleset());

    let mut previous: Option<Vec<String>> = None;
    for _ in 0..3 {
        let report = engine.evaluate(&snapshot).await.unwrap();
        let ids: Vec<String> = report.findings().iter().map(|f| f.id.clone()).collect();
        if let Some(prev) = &previous {
            assert_eq!(prev, &ids);
        }
        assert_eq!(report.percentage, 40);
        previous = Some(ids);
    }
}

#[tokio::test]
async fn test_summary_finding_reflects_the_percentage() {
    let snapshot = MemorySnapshot::new("partial")
        .with_file("README.md", "# Partial\n")
        .with_file("infra/main.bicep", "param location string\n");

    let engine = RuleEngine::new(worked_example_ruleset());
    let report = engine.evaluate(&snapshot).await.unwrap();

    let summary = report
        .findings()
        .iter()
        .find(|f| f.rule == Rule::Summary)
        .unwrap();
    assert!(summary.message.contains(&format!("{}%", report.percentage)));
    assert_eq!(
        report.rule_findings().count() + 1,
        report.findings().len(),
        "summary is excluded from per-rule findings"
    );
}

#[tokio::test]
async fn test_standard_preset_on_a_realistic_template() {
    let readme = "# Template\n\
        ## Features\n\
        ## Getting Started\n\
        ## Guidance\n\
        ## Resources\n\
        ## Architecture\n\
        ![architecture](docs/arch.png)\n";
    let bicep = "targetScope = 'subscription'\n\
        resource rg 'Microsoft.Resources/resourceGroups@2022-09-01' = {\n\
          identity: { type: 'SystemAssigned' }\n\
        }\n";

    let snapshot = MemorySnapshot::new("template")
        .with_file("README.md", readme)
        .with_file("LICENSE", "MIT")
        .with_file("SECURITY.md", "# Security")
        .with_file("CONTRIBUTING.md", "# Contributing")
        .with_file(".github/workflows/azure-dev.yml", "on: push\n")
        .with_file(".github/workflows/validate-template.yaml", "on: push\n")
        .with_file("infra/main.bicep", bicep)
        .with_file("azure.yaml", "name: template\nservices:\n  web:\n    host: appservice\n")
        .with_default_branch("main");

    let engine = RuleEngine::new(Preset::Standard.ruleset());
    let report = engine.evaluate(&snapshot).await.unwrap();

    assert_eq!(report.issue_count, 0, "{:#?}", report.issues().collect::<Vec<_>>());
    assert_eq!(report.percentage, 100);
}

#[tokio::test]
async fn test_wrong_default_branch_is_an_error() {
    let snapshot = MemorySnapshot::new("template")
        .with_file("azure.yaml", "name: t\nservices:\n  web:\n")
        .with_default_branch("master");

    let mut config = Preset::Minimal.ruleset();
    config.repository.default_branch = Some("main".to_string());

    let engine = RuleEngine::new(config);
    let report = engine.evaluate(&snapshot).await.unwrap();

    let branch = report
        .rule_findings()
        .find(|f| f.id == "repository-default-branch")
        .unwrap();
    assert!(branch.is_issue());
    assert!(branch.message.contains("master"));
    assert!(branch.message.contains("main"));
}

#[tokio::test]
async fn test_concurrent_evaluations_do_not_interfere() {
    let compliant = MemorySnapshot::new("complete")
        .with_file("README.md", "# Complete\n## Getting Started\n")
        .with_file(
            "infra/main.bicep",
            "resource sa 'Microsoft.Storage/storageAccounts@2023-01-01' = {}\n",
        )
        .with_file("azure.yaml", "name: complete\n");
    let broken = MemorySnapshot::new("broken");
    let engine = RuleEngine::new(worked_example_ruleset());

    let evaluations = futures::future::join_all(vec![
        engine.evaluate(&compliant),
        engine.evaluate(&broken),
        engine.evaluate(&compliant),
        engine.evaluate(&broken),
    ])
    .await;

    let reports: Vec<_> = evaluations.into_iter().map(|r| r.unwrap()).collect();
    assert_eq!(reports[0].percentage, 100);
    assert_eq!(reports[2].percentage, 100);
    assert_eq!(reports[1].percentage, reports[3].percentage);
    assert_eq!(reports[1].repository, "broken");
}

#[test]
fn test_percentage_is_rounded_to_nearest_integer() {
    assert_eq!(compute_percentage(1, 2), 33);
    assert_eq!(compute_percentage(2, 1), 67);
    assert_eq!(compute_percentage(2, 3), 40);
    assert_eq!(compute_percentage(0, 0), 0);
}
