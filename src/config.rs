//! Formatter profile configuration.
//!
//! Profiles are loaded from `configs/*.json`. When the directory is missing the
//! built-in `default` profile is used so the service still starts.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::abutter::{AcronymSet, DEFAULT_ACRONYMS};

/// Per-deployment formatter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatterConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Alphabetic runs kept uppercase in abutter text (e.g. "AC", "PB").
    #[serde(default = "default_acronyms")]
    pub acronyms: Vec<String>,
    /// Reject incomplete boundaries instead of rendering them.
    #[serde(default)]
    pub strict: bool,
}

fn default_acronyms() -> Vec<String> {
    DEFAULT_ACRONYMS.iter().map(|a| a.to_string()).collect()
}

impl FormatterConfig {
    pub fn acronym_set(&self) -> AcronymSet {
        AcronymSet::new(&self.acronyms)
    }
}

/// Built-in lenient profile.
pub fn create_default_config() -> FormatterConfig {
    FormatterConfig {
        name: "default".to_string(),
        description: "Lenient notarial formatting".to_string(),
        acronyms: default_acronyms(),
        strict: false,
    }
}

/// All loaded profiles.
#[derive(Debug)]
pub struct ConfigStore {
    configs: HashMap<String, FormatterConfig>,
    default_config: String,
}

impl ConfigStore {
    /// Load every `*.json` profile in `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            anyhow::bail!("Config directory does not exist: {:?}", dir);
        }

        let mut configs = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();

            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config: {:?}", path))?;

                let config: FormatterConfig = serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse config: {:?}", path))?;

                info!("Loaded config: {} from {:?}", config.name, path);
                configs.push(config);
            }
        }

        if configs.is_empty() {
            anyhow::bail!("No configs found in {:?}", dir);
        }

        Self::from_configs(configs)
    }

    /// Load from `dir`, falling back to the built-in default when it is missing.
    pub fn load_or_builtin(dir: &Path) -> Result<Self> {
        if dir.exists() {
            return Self::load_from_dir(dir);
        }
        warn!("Config directory {:?} not found, using built-in default", dir);
        Self::from_configs(vec![create_default_config()])
    }

    pub fn from_configs(configs: Vec<FormatterConfig>) -> Result<Self> {
        let map: HashMap<String, FormatterConfig> = configs
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();

        let default_config = Self::pick_default(&map).context("No configs provided")?;

        Ok(Self {
            configs: map,
            default_config,
        })
    }

    pub fn get(&self, name: &str) -> Option<&FormatterConfig> {
        self.configs.get(name)
    }

    /// Profile by name, or the default profile when `name` is `None`.
    pub fn resolve(&self, name: Option<&str>) -> Option<&FormatterConfig> {
        self.get(name.unwrap_or(self.default_config.as_str()))
    }

    pub fn default_name(&self) -> &str {
        &self.default_config
    }

    /// Sorted profile names.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.configs.keys().cloned().collect();
        names.sort();
        names
    }

    fn pick_default(configs: &HashMap<String, FormatterConfig>) -> Option<String> {
        if configs.contains_key("default") {
            return Some("default".to_string());
        }
        let mut names: Vec<&String> = configs.keys().collect();
        names.sort();
        names.first().map(|n| n.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_shipped_configs() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs");
        let store = ConfigStore::load_from_dir(&dir).unwrap();
        assert_eq!(store.list(), vec!["default", "strict"]);
        assert_eq!(store.default_name(), "default");
        assert!(store.get("strict").unwrap().strict);
        assert_eq!(store.resolve(None).unwrap().name, "default");
    }

    #[test]
    fn test_missing_dir_falls_back_to_builtin() {
        let store = ConfigStore::load_or_builtin(Path::new("/nonexistent/configs")).unwrap();
        assert_eq!(store.list(), vec!["default"]);
        assert!(ConfigStore::load_from_dir(Path::new("/nonexistent/configs")).is_err());
    }

    #[test]
    fn test_default_acronyms_when_omitted() {
        let config: FormatterConfig = serde_json::from_str(r#"{"name": "bare"}"#).unwrap();
        assert_eq!(config.acronyms, vec!["AC", "ACS", "EB", "PB", "E", "B"]);
        assert!(!config.strict);
        assert!(config.acronym_set().contains("pb"));
    }

    #[test]
    fn test_pick_default_without_default_profile() {
        let mut a = create_default_config();
        a.name = "zeta".to_string();
        let mut b = create_default_config();
        b.name = "alpha".to_string();
        let store = ConfigStore::from_configs(vec![a, b]).unwrap();
        assert_eq!(store.default_name(), "alpha");
        assert!(store.resolve(Some("missing")).is_none());
    }

    #[test]
    fn test_empty_configs_rejected() {
        assert!(ConfigStore::from_configs(Vec::new()).is_err());
    }
}
