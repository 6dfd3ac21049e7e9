//! Authentication heuristics for infrastructure files
//!
//! Classifies Bicep/ARM text by regex families: managed-identity declaration
//! shapes, legacy credential indicators (connection strings, keys, SAS
//! tokens), and a fixed catalog of Azure resource types that require
//! authentication. Substring and regex matching only; casing in real-world
//! templates varies, so everything is case-insensitive.

use lazy_static::lazy_static;
use regex::Regex;

/// Label of the key-vault indicator; only legacy when the file declares no
/// identity to resolve the secret with
const KEY_VAULT_INDICATOR: &str = "key vault secret reference";

lazy_static! {
    /// Structurally distinct ways a template declares managed identity
    static ref MANAGED_IDENTITY: Vec<Regex> = vec![
        Regex::new(r"(?i)managedidentit(?:y|ies)").unwrap(),
        Regex::new(r"(?i)identity\s*:\s*\{").unwrap(),
        Regex::new(r"(?i)type\s*:\s*'(?:SystemAssigned|UserAssigned)").unwrap(),
        Regex::new(r"(?i)Microsoft\.ManagedIdentity/userAssignedIdentities").unwrap(),
        Regex::new(r"(?i)useManagedIdentity\s*[:=]\s*true").unwrap(),
    ];

    /// Legacy credential indicators, each with a display label
    static ref LEGACY_INDICATORS: Vec<(&'static str, Regex)> = vec![
        (
            "connection string",
            Regex::new(r"(?i)connection\s*_?string").unwrap(),
        ),
        (
            "account key access",
            Regex::new(r"(?i)listkeys\s*\(|accountkey").unwrap(),
        ),
        (
            "primary/secondary key",
            Regex::new(r"(?i)(?:primary|secondary)key").unwrap(),
        ),
        (
            "SAS token",
            Regex::new(r"(?i)sastoken|sharedaccesssignature|[?&]sig=").unwrap(),
        ),
        (
            "storage account key",
            Regex::new(r"(?i)storageaccountkey").unwrap(),
        ),
        (
            KEY_VAULT_INDICATOR,
            Regex::new(r"(?i)secreturi|getsecret\s*\(").unwrap(),
        ),
        (
            "credentials in connection string",
            Regex::new(r"(?i)(?:password|pwd|sharedaccesskey)\s*=").unwrap(),
        ),
    ];

    /// Azure resource types that require authentication when provisioned
    static ref AUTH_RESOURCES: Vec<(&'static str, &'static str)> = vec![
        ("microsoft.storage/storageaccounts", "Storage"),
        ("microsoft.keyvault/vaults", "Key Vault"),
        ("microsoft.documentdb/databaseaccounts", "Cosmos DB"),
        ("microsoft.sql/servers", "SQL"),
        ("microsoft.web/sites", "Web Apps"),
        ("microsoft.containerregistry/registries", "Container Registry"),
        ("microsoft.servicebus/namespaces", "Service Bus"),
        ("microsoft.eventhub/namespaces", "Event Hub"),
        ("microsoft.apimanagement/service", "API Management"),
        ("microsoft.cognitiveservices/accounts", "Cognitive Services"),
        ("microsoft.containerservice/managedclusters", "AKS"),
        ("microsoft.cache/redis", "Redis"),
        ("microsoft.search/searchservices", "Search"),
        ("microsoft.operationalinsights/workspaces", "Log Analytics"),
    ];
}

/// One legacy-credential match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyHit {
    /// Indicator label for reporting
    pub label: &'static str,
    /// The first matching line, trimmed
    pub line: String,
}

/// Classification of one infrastructure file's authentication posture
#[derive(Debug, Clone, Default)]
pub struct AuthProfile {
    /// Whether any managed-identity declaration shape matched
    pub uses_managed_identity: bool,
    /// Legacy credential indicators found, one entry per indicator
    pub legacy: Vec<LegacyHit>,
    /// Display names of referenced auth-requiring resource types
    pub auth_resources: Vec<&'static str>,
}

/// Classify infrastructure-file text
pub fn detect_auth(text: &str) -> AuthProfile {
    let uses_managed_identity = MANAGED_IDENTITY.iter().any(|re| re.is_match(text));

    let mut legacy = Vec::new();
    for (label, re) in LEGACY_INDICATORS.iter() {
        if *label == KEY_VAULT_INDICATOR && uses_managed_identity {
            continue;
        }
        if let Some(line) = text.lines().find(|l| re.is_match(l)) {
            legacy.push(LegacyHit {
                label,
                line: line.trim().to_string(),
            });
        }
    }

    let lower = text.to_lowercase();
    let auth_resources = AUTH_RESOURCES
        .iter()
        .filter(|(literal, _)| lower.contains(literal))
        .map(|(_, name)| *name)
        .collect();

    AuthProfile {
        uses_managed_identity,
        legacy,
        auth_resources,
    }
}

/// Permissive check that text references a resource name literal
pub fn contains_resource(text: &str, resource: &str) -> bool {
    text.to_lowercase().contains(&resource.to_lowercase())
}
