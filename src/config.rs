//! Configuration
//!
//! Canonicalization policy for identifiers built from raw data, and the
//! top-level config file consumed by the `node-group` binary.

use crate::error::{NodeGroupError, Result};
use crate::ingestion::IngestionOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "NODE_GROUP_CONFIG";

/// Case handling for one identifier field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    /// Keep the field exactly as observed
    #[default]
    Sensitive,

    /// Lowercase the field before building the identifier
    Insensitive,
}

impl CaseMode {
    fn apply(self, field: &str) -> String {
        match self {
            CaseMode::Sensitive => field.to_string(),
            CaseMode::Insensitive => field.to_lowercase(),
        }
    }
}

/// Normalization applied to raw `(kind, value)` fields.
///
/// The default is the identity transform: identifiers match only when they
/// are byte-for-byte equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalConfig {
    /// Strip leading/trailing whitespace from both fields
    #[serde(default)]
    pub trim_whitespace: bool,

    #[serde(default)]
    pub kind_case: CaseMode,

    #[serde(default)]
    pub value_case: CaseMode,
}

impl CanonicalConfig {
    /// Exact matching (no normalization)
    pub fn exact() -> Self {
        Self::default()
    }

    /// Trimmed, case-insensitive matching on both fields
    pub fn relaxed() -> Self {
        Self {
            trim_whitespace: true,
            kind_case: CaseMode::Insensitive,
            value_case: CaseMode::Insensitive,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::exact()
    }

    pub fn canonical_kind(&self, kind: &str) -> String {
        self.kind_case.apply(self.trim(kind))
    }

    pub fn canonical_value(&self, value: &str) -> String {
        self.value_case.apply(self.trim(value))
    }

    fn trim<'a>(&self, field: &'a str) -> &'a str {
        if self.trim_whitespace {
            field.trim()
        } else {
            field
        }
    }
}

/// Top-level configuration file.
///
/// ```json
/// {
///   "canonical": { "trim_whitespace": true, "value_case": "insensitive" },
///   "ingestion": { "columns": ["email", "device_id"], "emit_singletons": true }
/// }
/// ```
///
/// A top-level `canonical` block, when present, replaces
/// `ingestion.canonical`. Without it the nested block is used as written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeGroupConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical: Option<CanonicalConfig>,

    #[serde(default)]
    pub ingestion: IngestionOptions,
}

/// Command-line settings layered over a config file.
///
/// `None` and `false` leave the file's value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub columns: Option<Vec<String>>,
    pub column_pattern: Option<String>,
    pub trim_whitespace: bool,
    pub case_insensitive_kinds: bool,
    pub case_insensitive_values: bool,
    pub emit_singletons: bool,
}

impl NodeGroupConfig {
    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            NodeGroupError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content).map_err(|e| match e {
            NodeGroupError::Json(err) => {
                NodeGroupError::Config(format!("Failed to parse {}: {}", path.display(), err))
            }
            other => other,
        })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: NodeGroupConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    /// Load from the file named by `NODE_GROUP_CONFIG`, or defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::info!("Loading config from {} ({})", path, CONFIG_ENV_VAR);
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// An explicit path wins over `NODE_GROUP_CONFIG`
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::from_env(),
        }
    }

    /// Ingestion options with the top-level canonical policy folded in
    pub fn ingestion_options(&self) -> IngestionOptions {
        let mut options = self.ingestion.clone();
        if let Some(canonical) = &self.canonical {
            options.canonical = canonical.clone();
        }
        options
    }

    /// Ingestion options with command-line settings applied last
    pub fn apply_overrides(&self, overrides: &ConfigOverrides) -> IngestionOptions {
        let mut options = self.ingestion_options();
        if let Some(columns) = &overrides.columns {
            options.columns = Some(columns.clone());
        }
        if let Some(pattern) = &overrides.column_pattern {
            options.column_pattern = Some(pattern.clone());
        }
        if overrides.trim_whitespace {
            options.canonical.trim_whitespace = true;
        }
        if overrides.case_insensitive_kinds {
            options.canonical.kind_case = CaseMode::Insensitive;
        }
        if overrides.case_insensitive_values {
            options.canonical.value_case = CaseMode::Insensitive;
        }
        if overrides.emit_singletons {
            options.emit_singletons = true;
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let config = CanonicalConfig::default();
        assert!(config.is_identity());
        assert_eq!(config.canonical_kind(" Email "), " Email ");
        assert_eq!(config.canonical_value("A@B.com"), "A@B.com");
    }

    #[test]
    fn test_relaxed_trims_and_lowercases() {
        let config = CanonicalConfig::relaxed();
        assert!(!config.is_identity());
        assert_eq!(config.canonical_kind(" Email "), "email");
        assert_eq!(config.canonical_value("\tA@B.com\n"), "a@b.com");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = NodeGroupConfig::from_json(r#"{"canonical": {"value_case": "insensitive"}}"#)
            .unwrap();
        let canonical = config.canonical.clone().unwrap();
        assert_eq!(canonical.value_case, CaseMode::Insensitive);
        assert_eq!(canonical.kind_case, CaseMode::Sensitive);
        assert!(!canonical.trim_whitespace);
        assert!(config.ingestion.skip_blank_cells);
        assert!(config.ingestion.columns.is_none());
    }

    #[test]
    fn test_top_level_canonical_wins() {
        let config = NodeGroupConfig::from_json(
            r#"{
                "canonical": {"trim_whitespace": true},
                "ingestion": {"canonical": {"kind_case": "insensitive"}, "emit_singletons": true}
            }"#,
        )
        .unwrap();
        let options = config.ingestion_options();
        assert!(options.canonical.trim_whitespace);
        assert_eq!(options.canonical.kind_case, CaseMode::Sensitive);
        assert!(options.emit_singletons);
    }

    #[test]
    fn test_nested_canonical_kept_without_top_level() {
        let config = NodeGroupConfig::from_json(
            r#"{"ingestion": {"canonical": {"value_case": "insensitive", "trim_whitespace": true}}}"#,
        )
        .unwrap();
        assert!(config.canonical.is_none());

        let options = config.ingestion_options();
        assert_eq!(options.canonical.value_case, CaseMode::Insensitive);
        assert!(options.canonical.trim_whitespace);
        assert_eq!(options.canonical.canonical_value(" A@X.com "), "a@x.com");
    }

    #[test]
    fn test_overrides_replace_file_columns() {
        let config = NodeGroupConfig::from_json(
            r#"{"ingestion": {"columns": ["email", "device"], "column_pattern": "^e"}}"#,
        )
        .unwrap();
        let overrides = ConfigOverrides {
            columns: Some(vec!["cookie".to_string()]),
            ..Default::default()
        };

        let options = config.apply_overrides(&overrides);
        assert_eq!(options.columns, Some(vec!["cookie".to_string()]));
        assert_eq!(options.column_pattern.as_deref(), Some("^e"));
    }

    #[test]
    fn test_overrides_layer_on_file_canonical() {
        let config = NodeGroupConfig::from_json(
            r#"{"canonical": {"value_case": "insensitive"}, "ingestion": {"emit_singletons": true}}"#,
        )
        .unwrap();
        let overrides = ConfigOverrides {
            trim_whitespace: true,
            ..Default::default()
        };

        let options = config.apply_overrides(&overrides);
        assert!(options.canonical.trim_whitespace);
        assert_eq!(options.canonical.value_case, CaseMode::Insensitive);
        assert_eq!(options.canonical.kind_case, CaseMode::Sensitive);
        assert!(options.emit_singletons);
    }

    #[test]
    fn test_empty_overrides_keep_file_values() {
        let config = NodeGroupConfig::from_json(
            r#"{"canonical": {"kind_case": "insensitive"}, "ingestion": {"columns": ["a"]}}"#,
        )
        .unwrap();
        assert_eq!(
            config.apply_overrides(&ConfigOverrides::default()),
            config.ingestion_options()
        );
    }

    #[test]
    fn test_resolve_prefers_explicit_path() {
        let mut from_env = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut from_env, br#"{"ingestion": {"columns": ["env"]}}"#)
            .unwrap();
        let mut explicit = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut explicit, br#"{"ingestion": {"columns": ["file"]}}"#)
            .unwrap();

        std::env::set_var(CONFIG_ENV_VAR, from_env.path());
        let env_config = NodeGroupConfig::resolve(None).unwrap();
        let file_config = NodeGroupConfig::resolve(Some(explicit.path())).unwrap();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(env_config.ingestion.columns, Some(vec!["env".to_string()]));
        assert_eq!(file_config.ingestion.columns, Some(vec!["file".to_string()]));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(NodeGroupConfig::from_json("{not json").is_err());
    }
}
