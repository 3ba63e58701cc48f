//! Credential lookup for live sources.
//!
//! Live adapters ask a [`CredentialProvider`] for the API keys their source
//! requires. A missing key is not an error here: the adapter reports
//! `SourceUnavailable` and the aggregator skips it.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::source::{SourceId, SourceRegistry};

/// Source of API keys and tokens.
pub trait CredentialProvider: Send + Sync {
    /// Value of `key` for `source`, `None` when absent or empty.
    fn get_credential(&self, source: SourceId, key: &str) -> Option<String>;

    /// Required keys of `source` that have no value.
    fn missing_keys(&self, source: SourceId) -> Vec<&'static str> {
        source
            .required_keys()
            .iter()
            .copied()
            .filter(|key| self.get_credential(source, key).is_none())
            .collect()
    }
}

/// Credentials from the environment, falling back to the config file.
///
/// The environment variable named after the key wins; otherwise the value
/// under `[sources.credentials.<source>]` is used.
#[derive(Debug, Clone, Default)]
pub struct ConfigCredentials {
    by_source: HashMap<SourceId, HashMap<String, String>>,
    use_env: bool,
}

impl ConfigCredentials {
    /// Build from the config table, keyed by source name.
    pub fn new(table: &HashMap<String, HashMap<String, String>>) -> Self {
        let mut by_source: HashMap<SourceId, HashMap<String, String>> = HashMap::new();
        for (name, keys) in table {
            match SourceId::from_name(name) {
                Some(id) => by_source.entry(id).or_default().extend(keys.clone()),
                None => warn!(source = %name, "Ignoring credentials for unknown source"),
            }
        }
        Self {
            by_source,
            use_env: true,
        }
    }

    /// Same as [`ConfigCredentials::new`] but never reads the environment.
    pub fn without_env(table: &HashMap<String, HashMap<String, String>>) -> Self {
        Self {
            use_env: false,
            ..Self::new(table)
        }
    }

    /// Key names configured in the file, per source label. Values are not
    /// exposed.
    pub fn configured_key_names(&self) -> HashMap<String, Vec<String>> {
        self.by_source
            .iter()
            .map(|(id, keys)| {
                let mut names: Vec<String> = keys
                    .iter()
                    .filter(|(_, v)| !v.trim().is_empty())
                    .map(|(k, _)| k.clone())
                    .collect();
                names.sort();
                (id.label().to_string(), names)
            })
            .collect()
    }
}

impl CredentialProvider for ConfigCredentials {
    fn get_credential(&self, source: SourceId, key: &str) -> Option<String> {
        if self.use_env {
            if let Ok(value) = std::env::var(key) {
                if !value.trim().is_empty() {
                    return Some(value);
                }
            }
        }
        self.by_source
            .get(&source)
            .and_then(|keys| keys.get(key))
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }
}

/// In-memory credentials.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    values: HashMap<(SourceId, String), String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: SourceId, key: &str, value: &str) -> Self {
        self.values
            .insert((source, key.to_string()), value.to_string());
        self
    }
}

impl CredentialProvider for StaticCredentials {
    fn get_credential(&self, source: SourceId, key: &str) -> Option<String> {
        self.values
            .get(&(source, key.to_string()))
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }
}

/// Configuration status of one source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceStatus {
    pub id: SourceId,
    pub label: String,
    /// Adapter wired for this source.
    pub registered: bool,
    /// Wired adapter performs live lookups.
    pub live: bool,
    pub required_keys: Vec<String>,
    pub missing_keys: Vec<String>,
    /// All required keys are present.
    pub configured: bool,
}

/// Status of every known source.
pub fn source_statuses(
    registry: &SourceRegistry,
    credentials: &dyn CredentialProvider,
) -> Vec<SourceStatus> {
    SourceId::ALL
        .iter()
        .map(|&id| {
            let adapter = registry.get(id);
            let missing: Vec<String> = credentials
                .missing_keys(id)
                .into_iter()
                .map(String::from)
                .collect();
            SourceStatus {
                id,
                label: id.label().to_string(),
                registered: adapter.is_some(),
                live: adapter.map(|a| a.is_live()).unwrap_or(false),
                required_keys: id.required_keys().iter().map(|k| k.to_string()).collect(),
                configured: missing.is_empty(),
                missing_keys: missing,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SyntheticSource;
    use std::sync::Arc;

    fn table() -> HashMap<String, HashMap<String, String>> {
        let mut google = HashMap::new();
        google.insert("GOOGLE_API_KEY".to_string(), "abc".to_string());
        google.insert("GOOGLE_CSE_ID".to_string(), "  ".to_string());
        let mut table = HashMap::new();
        table.insert("Google".to_string(), google);
        table.insert("Yandex".to_string(), HashMap::new());
        table
    }

    #[test]
    fn test_config_credentials_lookup() {
        let creds = ConfigCredentials::without_env(&table());
        assert_eq!(
            creds.get_credential(SourceId::Google, "GOOGLE_API_KEY"),
            Some("abc".to_string())
        );
        // Blank values count as absent.
        assert_eq!(creds.get_credential(SourceId::Google, "GOOGLE_CSE_ID"), None);
        assert_eq!(creds.missing_keys(SourceId::Google), vec!["GOOGLE_CSE_ID"]);
        assert!(creds.missing_keys(SourceId::DuckDuckGo).is_empty());
    }

    #[test]
    fn test_configured_key_names_hide_values() {
        let creds = ConfigCredentials::without_env(&table());
        let names = creds.configured_key_names();
        assert_eq!(names.get("Google").unwrap(), &vec!["GOOGLE_API_KEY".to_string()]);
    }

    #[test]
    fn test_static_credentials() {
        let creds = StaticCredentials::new().with(SourceId::Bravo, "BRAVO_API_KEY", "k");
        assert_eq!(
            creds.get_credential(SourceId::Bravo, "BRAVO_API_KEY"),
            Some("k".to_string())
        );
        assert_eq!(creds.get_credential(SourceId::Google, "BRAVO_API_KEY"), None);
    }

    #[test]
    fn test_source_statuses() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(SyntheticSource::new(SourceId::Google)));
        let creds = StaticCredentials::new().with(SourceId::Google, "GOOGLE_API_KEY", "k");

        let statuses = source_statuses(&registry, &creds);
        assert_eq!(statuses.len(), SourceId::ALL.len());

        let google = &statuses[0];
        assert!(google.registered);
        assert!(!google.live);
        assert!(!google.configured);
        assert_eq!(google.missing_keys, vec!["GOOGLE_CSE_ID".to_string()]);

        let ddg = statuses.iter().find(|s| s.id == SourceId::DuckDuckGo).unwrap();
        assert!(!ddg.registered);
        assert!(ddg.configured);
    }
}
