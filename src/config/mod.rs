//! Ruleset configuration
//!
//! A [`RulesetConfig`] is an immutable value describing every check the rule
//! engine applies: required files and folders, workflow file patterns, README
//! structure, infrastructure-file requirements, and repository settings. It is
//! loaded once (from a file or a preset) and passed by reference into each
//! evaluation; two concurrent evaluations may use different rulesets without
//! interference.

pub mod loader;
pub mod presets;

pub use loader::load_ruleset;
pub use presets::Preset;

use serde::{Deserialize, Serialize};

/// A complete governance ruleset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesetConfig {
    /// Ruleset name, echoed into reports
    #[serde(default = "default_name")]
    pub name: String,

    /// File paths that must exist at the repository root (case-insensitive)
    #[serde(default)]
    pub required_files: Vec<String>,

    /// Path prefixes that must contain at least one file
    #[serde(default)]
    pub required_folders: Vec<String>,

    /// Workflow file patterns; each must match at least one path
    #[serde(default)]
    pub workflow_patterns: Vec<WorkflowPattern>,

    /// README structural requirements; None disables the README checks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<ReadmeRequirements>,

    /// Infrastructure-file checks
    #[serde(default)]
    pub infra: InfraChecks,

    /// Deployment manifest (azure.yaml) checks
    #[serde(default)]
    pub deployment: DeploymentConfig,

    /// Repository settings checks
    #[serde(default)]
    pub repository: RepositoryConfig,
}

fn default_name() -> String {
    "standard".to_string()
}

impl Default for RulesetConfig {
    fn default() -> Self {
        Preset::Standard.ruleset()
    }
}

/// A required workflow-file pattern with its violation message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowPattern {
    /// Regex applied to lowercased repository paths
    pub pattern: String,

    /// Message reported when no path matches
    pub message: String,
}

/// README heading and diagram requirements
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReadmeRequirements {
    /// Level-2 headings that must be present (case-insensitive exact match)
    #[serde(default)]
    pub required_headings: Vec<String>,

    /// Architecture diagram requirement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture_diagram: Option<ArchitectureDiagram>,
}

/// Requirement that a heading exists and is directly followed by an image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchitectureDiagram {
    /// The heading under which the diagram must appear
    pub heading: String,

    /// Whether an image must directly follow the heading
    #[serde(default = "default_true")]
    pub requires_image: bool,
}

/// Infrastructure-file checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfraChecks {
    /// Folder holding infrastructure files
    #[serde(default = "default_infra_folder")]
    pub folder: String,

    /// File extensions counted as infrastructure files
    #[serde(default = "default_infra_extensions")]
    pub extensions: Vec<String>,

    /// Resource name literals every infra file must reference
    #[serde(default)]
    pub required_resources: Vec<String>,

    /// Authentication heuristics
    #[serde(default)]
    pub security: SecurityBestPractices,
}

impl Default for InfraChecks {
    fn default() -> Self {
        Self {
            folder: default_infra_folder(),
            extensions: default_infra_extensions(),
            required_resources: Vec::new(),
            security: SecurityBestPractices::default(),
        }
    }
}

fn default_infra_folder() -> String {
    "infra".to_string()
}

fn default_infra_extensions() -> Vec<String> {
    vec!["bicep".to_string()]
}

/// Switches for the authentication heuristics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityBestPractices {
    /// Whether the heuristics run at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Flag legacy credential patterns (connection strings, keys, SAS)
    #[serde(default = "default_true")]
    pub detect_insecure_auth: bool,

    /// Flag auth-requiring resources with no detectable auth configuration
    #[serde(default = "default_true")]
    pub check_anonymous_access: bool,
}

impl Default for SecurityBestPractices {
    fn default() -> Self {
        Self {
            enabled: true,
            detect_insecure_auth: true,
            check_anonymous_access: true,
        }
    }
}

/// Deployment manifest checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Require a root-level azure.yaml/azure.yml
    #[serde(default = "default_true")]
    pub require_manifest: bool,

    /// Require a top-level `services:` key in the manifest
    #[serde(default = "default_true")]
    pub must_define_services: bool,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            require_manifest: true,
            must_define_services: true,
        }
    }
}

/// Repository settings checks
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RepositoryConfig {
    /// Default branch the repository must use; None disables the check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ruleset_is_standard_preset() {
        let config = RulesetConfig::default();
        assert_eq!(config.name, "standard");
        assert!(config
            .required_files
            .iter()
            .any(|f| f.eq_ignore_ascii_case("README.md")));
    }

    #[test]
    fn test_minimal_toml_round_trip() {
        let toml_content = r#"
name = "custom"
required_files = ["README.md"]
required_folders = ["infra"]

[[workflow_patterns]]
pattern = 'azure-dev\.ya?ml$'
message = "Missing azd workflow"

[infra]
required_resources = ["Microsoft.Storage/storageAccounts"]
"#;
        let config: RulesetConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.name, "custom");
        assert_eq!(config.workflow_patterns.len(), 1);
        assert_eq!(config.infra.folder, "infra");
        assert!(config.infra.security.detect_insecure_auth);
        assert!(config.deployment.require_manifest);
    }

    #[test]
    fn test_security_switches_parse() {
        let toml_content = r#"
[infra.security]
detect_insecure_auth = false
"#;
        let config: RulesetConfig = toml::from_str(toml_content).unwrap();
        assert!(!config.infra.security.detect_insecure_auth);
        assert!(config.infra.security.check_anonymous_access);
    }
}
