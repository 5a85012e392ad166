use crate::prelude::*;
use modelgen_utils::{pluralize, tableize, underscore};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

/// Storage prefix applied when a config does not set one.
pub const DEFAULT_STORAGE_PREFIX: &str = "tpt_";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid resolver config: {0}")]
    Parse(#[from] toml::de::Error),
}

///
/// ResolveConfig
///
/// Naming knobs for a resolution run.
///
/// ```toml
/// storage_prefix = "app_"
///
/// [underscore_overrides]
/// OAuthToken = "oauth_token"
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveConfig {
    pub storage_prefix: String,
    pub underscore_overrides: BTreeMap<String, String>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            underscore_overrides: BTreeMap::new(),
        }
    }
}

impl ResolveConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Underscore form of a class name, honoring configured overrides.
    #[must_use]
    pub fn underscore(&self, name: &str) -> String {
        self.underscore_overrides
            .get(name)
            .cloned()
            .unwrap_or_else(|| underscore(name))
    }

    #[must_use]
    pub fn tableize(&self, name: &str) -> String {
        match self.underscore_overrides.get(name) {
            Some(snake) => pluralize(snake),
            None => tableize(name),
        }
    }

    /// Default storage name of a class that sets no explicit `table`.
    #[must_use]
    pub fn storage_name(&self, name: &str) -> String {
        format!("{}{}", self.storage_prefix, self.tableize(name))
    }
}
