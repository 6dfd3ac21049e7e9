//! Ruleset loading

use std::path::Path;

use crate::error::RulesetError;

use super::RulesetConfig;

/// Default ruleset file name
pub const RULESET_FILENAME: &str = ".gatecheck.toml";

/// Load a ruleset from a TOML file, validating its workflow patterns
pub fn load_ruleset(path: &Path) -> Result<RulesetConfig, RulesetError> {
    let content = std::fs::read_to_string(path).map_err(|e| RulesetError::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;

    let config: RulesetConfig = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Validate a ruleset without loading it from disk
pub fn validate(config: &RulesetConfig) -> Result<(), RulesetError> {
    for wp in &config.workflow_patterns {
        regex::Regex::new(&wp.pattern).map_err(|e| RulesetError::InvalidPattern {
            pattern: wp.pattern.clone(),
            source: e,
        })?;
    }
    Ok(())
}

/// Serialize a ruleset to TOML
pub fn to_toml(config: &RulesetConfig) -> String {
    toml::to_string_pretty(config).unwrap_or_default()
}
