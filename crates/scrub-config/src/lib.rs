//! Configuration for scrub
//!
//! Loaded once at start-up and handed to the pipeline. TOML is the native
//! format; YAML files are accepted as well.

pub mod error;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use error::{ConfigError, Result};

/// Per-component settings tables, keyed by component name
pub type ComponentSettings = BTreeMap<String, serde_json::Value>;

pub const DEFAULT_SECRET: &str = "default-secret-key-change-in-production";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Key for hashing and encryption
    #[serde(default)]
    pub hmac_secret: String,

    #[serde(default = "default_threshold")]
    pub default_confidence_threshold: f64,

    #[serde(default = "default_strategy")]
    pub redaction_strategy: String,

    /// Hex characters kept from each entity digest
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,

    #[serde(default)]
    pub processing: ProcessingConfig,

    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    #[serde(default)]
    pub readers: ComponentSettings,

    #[serde(default)]
    pub preprocessors: ComponentSettings,

    #[serde(default)]
    pub postprocessors: ComponentSettings,

    #[serde(default)]
    pub writers: ComponentSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_language")]
    pub language: String,

    /// Entity types to detect; empty means every supported type
    #[serde(default)]
    pub entities: Vec<String>,

    /// Extra regex recognizers added to the built-in set
    #[serde(default)]
    pub custom_recognizers: Vec<CustomRecognizer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomRecognizer {
    pub entity_type: String,
    pub pattern: String,
    #[serde(default = "default_custom_score")]
    pub score: f64,
    /// Words that raise the score when they precede a match
    #[serde(default)]
    pub context: Vec<String>,
}

fn default_custom_score() -> f64 {
    0.85
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hmac_secret: DEFAULT_SECRET.to_string(),
            default_confidence_threshold: default_threshold(),
            redaction_strategy: default_strategy(),
            hash_length: default_hash_length(),
            processing: ProcessingConfig::default(),
            analyzer: AnalyzerConfig::default(),
            readers: ComponentSettings::new(),
            preprocessors: ComponentSettings::new(),
            postprocessors: ComponentSettings::new(),
            writers: ComponentSettings::new(),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            entities: Vec::new(),
            custom_recognizers: Vec::new(),
        }
    }
}

fn default_threshold() -> f64 {
    0.5
}

fn default_strategy() -> String {
    "hash".to_string()
}

fn default_hash_length() -> usize {
    16
}

fn default_language() -> String {
    "en".to_string()
}

impl Config {
    /// Load config from default location or create default if not found.
    ///
    /// The result is not validated; callers apply their overrides first.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::read(&path)
        } else {
            tracing::warn!(
                path = %path.display(),
                "No configuration found, writing defaults; change hmac_secret before real use"
            );
            let config = Config::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Load and validate a config file
    pub fn from_path(path: &Path) -> Result<Self> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file without validating it; `.yaml`/`.yml` are parsed
    /// as YAML, anything else as TOML
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        if is_yaml(path) {
            Self::from_yaml_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Write the config as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.hmac_secret.is_empty() {
            return Err(ConfigError::Invalid(
                "hmac_secret cannot be empty".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.default_confidence_threshold) {
            return Err(ConfigError::Invalid(format!(
                "default_confidence_threshold must be between 0.0 and 1.0, got {}",
                self.default_confidence_threshold
            )));
        }

        if !(1..=64).contains(&self.hash_length) {
            return Err(ConfigError::Invalid(format!(
                "hash_length must be between 1 and 64, got {}",
                self.hash_length
            )));
        }

        for recognizer in &self.analyzer.custom_recognizers {
            if recognizer.entity_type.is_empty() || recognizer.pattern.is_empty() {
                return Err(ConfigError::Invalid(
                    "custom recognizers need an entity_type and a pattern".to_string(),
                ));
            }
            if !(0.0..=1.0).contains(&recognizer.score) {
                return Err(ConfigError::Invalid(format!(
                    "score for custom recognizer {} must be between 0.0 and 1.0, got {}",
                    recognizer.entity_type, recognizer.score
                )));
            }
        }

        Ok(())
    }

    /// Settings table for a named component, if configured
    pub fn reader_settings(&self, name: &str) -> Option<serde_json::Value> {
        self.readers.get(name).cloned()
    }

    pub fn preprocessor_settings(&self, name: &str) -> Option<serde_json::Value> {
        self.preprocessors.get(name).cloned()
    }

    pub fn postprocessor_settings(&self, name: &str) -> Option<serde_json::Value> {
        self.postprocessors.get(name).cloned()
    }

    pub fn writer_settings(&self, name: &str) -> Option<serde_json::Value> {
        self.writers.get(name).cloned()
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "scrub", "scrub") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.scrub/config.toml")
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.redaction_strategy, "hash");
        assert_eq!(config.default_confidence_threshold, 0.5);
        assert_eq!(config.hash_length, 16);
        assert!(config.analyzer.entities.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.hmac_secret, config.hmac_secret);
        assert_eq!(parsed.redaction_strategy, config.redaction_strategy);
    }

    #[test]
    fn test_component_settings_parse() {
        let toml_str = r#"
hmac_secret = "test-secret"
redaction_strategy = "replace"

[analyzer]
entities = ["PERSON", "EMAIL_ADDRESS"]

[preprocessors.field_selector]
fields = ["Name", "Email"]

[postprocessors.dict_merger]
preserve_unselected = false
"#;
        let config = Config::from_toml_str(toml_str).unwrap();
        assert_eq!(config.hmac_secret, "test-secret");
        assert_eq!(config.analyzer.entities, vec!["PERSON", "EMAIL_ADDRESS"]);

        let selector = config.preprocessor_settings("field_selector").unwrap();
        assert_eq!(selector["fields"][1], "Email");
        let merger = config.postprocessor_settings("dict_merger").unwrap();
        assert_eq!(merger["preserve_unselected"], false);
        assert!(config.writer_settings("csv_file").is_none());
    }

    #[test]
    fn test_yaml_config() {
        let yaml = r#"
hmac_secret: yaml-secret
default_confidence_threshold: 0.7
readers:
  csv_file:
    delimiter: ";"
"#;
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.hmac_secret, "yaml-secret");
        assert_eq!(config.default_confidence_threshold, 0.7);
        assert_eq!(config.reader_settings("csv_file").unwrap()["delimiter"], ";");
    }

    #[test]
    fn test_validate_empty_secret() {
        let config = Config {
            hmac_secret: String::new(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("hmac_secret cannot be empty"));
    }

    #[test]
    fn test_validate_threshold_range() {
        for threshold in [-0.1, 1.5] {
            let config = Config {
                default_confidence_threshold: threshold,
                ..Config::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        }

        for threshold in [0.0, 1.0] {
            let config = Config {
                default_confidence_threshold: threshold,
                ..Config::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_validate_hash_length() {
        let config = Config {
            hash_length: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_custom_recognizers_parse() {
        let toml_str = r#"
[[analyzer.custom_recognizers]]
entity_type = "EMPLOYEE_ID"
pattern = "\\bEMP-\\d{5}\\b"
context = ["employee"]
"#;
        let config = Config::from_toml_str(toml_str).unwrap();
        let custom = &config.analyzer.custom_recognizers[0];
        assert_eq!(custom.entity_type, "EMPLOYEE_ID");
        assert_eq!(custom.score, 0.85);
        assert_eq!(custom.context, vec!["employee"]);
        assert!(config.validate().is_ok());

        let mut bad = config.clone();
        bad.analyzer.custom_recognizers[0].score = 2.0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Config::from_path(Path::new("/nonexistent/scrub.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scrub.toml");

        let config = Config {
            hmac_secret: "saved".to_string(),
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::from_path(&path).unwrap();
        assert_eq!(loaded.hmac_secret, "saved");
    }

    #[test]
    fn test_read_defers_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scrub.yaml");
        std::fs::write(&path, "hmac_secret: ''\nhash_length: 8\n").unwrap();

        let config = Config::read(&path).unwrap();
        assert_eq!(config.hash_length, 8);
        assert!(matches!(Config::from_path(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_path_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scrub.yaml");
        std::fs::write(&path, "hmac_secret: \"\"\n").unwrap();

        let err = Config::from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
