//! Built-in ruleset presets

use super::{
    ArchitectureDiagram, DeploymentConfig, InfraChecks, ReadmeRequirements, RepositoryConfig,
    RulesetConfig, SecurityBestPractices, WorkflowPattern,
};

/// Available ruleset presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Full azd template definition-of-done ruleset
    Standard,
    /// Partner-submitted template ruleset (no diagram requirement)
    Partner,
    /// Presence checks only, no content heuristics
    Minimal,
}

impl Preset {
    /// Parse a preset name
    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" | "dod" => Some(Self::Standard),
            "partner" => Some(Self::Partner),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Get the preset name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Partner => "partner",
            Self::Minimal => "minimal",
        }
    }

    /// Build the ruleset for this preset
    pub fn ruleset(&self) -> RulesetConfig {
        match self {
            Self::Standard => standard(),
            Self::Partner => partner(),
            Self::Minimal => minimal(),
        }
    }
}

fn standard() -> RulesetConfig {
    RulesetConfig {
        name: "standard".to_string(),
        required_files: vec![
            "README.md".to_string(),
            "LICENSE".to_string(),
            "SECURITY.md".to_string(),
            "CONTRIBUTING.md".to_string(),
        ],
        required_folders: vec!["infra".to_string(), ".github/workflows".to_string()],
        workflow_patterns: vec![
            WorkflowPattern {
                pattern: r"^\.github/workflows/azure-dev\.ya?ml$".to_string(),
                message: "Missing azd provisioning workflow (.github/workflows/azure-dev.yml)"
                    .to_string(),
            },
            WorkflowPattern {
                pattern: r"^\.github/workflows/.*validat.*\.ya?ml$".to_string(),
                message: "Missing template validation workflow".to_string(),
            },
        ],
        readme: Some(ReadmeRequirements {
            required_headings: vec![
                "Features".to_string(),
                "Getting Started".to_string(),
                "Guidance".to_string(),
                "Resources".to_string(),
            ],
            architecture_diagram: Some(ArchitectureDiagram {
                heading: "Architecture".to_string(),
                requires_image: true,
            }),
        }),
        infra: InfraChecks {
            required_resources: vec!["Microsoft.Resources/resourceGroups".to_string()],
            ..InfraChecks::default()
        },
        deployment: DeploymentConfig::default(),
        repository: RepositoryConfig {
            default_branch: Some("main".to_string()),
        },
    }
}

fn partner() -> RulesetConfig {
    let mut config = standard();
    config.name = "partner".to_string();
    // Partners are not held to the diagram or branch requirements
    if let Some(readme) = config.readme.as_mut() {
        readme.architecture_diagram = None;
    }
    config.repository.default_branch = None;
    config.infra.required_resources = Vec::new();
    config
}

fn minimal() -> RulesetConfig {
    RulesetConfig {
        name: "minimal".to_string(),
        required_files: vec!["README.md".to_string()],
        required_folders: vec!["infra".to_string()],
        workflow_patterns: Vec::new(),
        readme: None,
        infra: InfraChecks {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_string() {
        assert_eq!(Preset::from_string("standard"), Some(Preset::Standard));
        assert_eq!(Preset::from_string("DOD"), Some(Preset::Standard));
        assert_eq!(Preset::from_string("partner"), Some(Preset::Partner));
        assert_eq!(Preset::from_string("minimal"), Some(Preset::Minimal));
        assert_eq!(Preset::from_string("nope"), None);
    }

    #[test]
    fn test_partner_relaxes_diagram_and_branch() {
        let config = Preset::Partner.ruleset();
        assert!(config.readme.as_ref().unwrap().architecture_diagram.is_none());
        assert!(config.repository.default_branch.is_none());
    }

    #[test]
    fn test_minimal_disables_heuristics() {
        let config = Preset::Minimal.ruleset();
        assert!(config.readme.is_none());
        assert!(!config.infra.security.enabled);
        assert!(!config.deployment.must_define_services);
    }

    #[test]
    fn test_standard_workflow_patterns_compile() {
        let config = Preset::Standard.ruleset();
        for wp in &config.workflow_patterns {
            assert!(regex::Regex::new(&wp.pattern).is_ok(), "{}", wp.pattern);
        }
    }
}
