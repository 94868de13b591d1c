//! Cleanup configuration file support.
//!
//! Settings are read from a TOML file:
//!
//! ```toml
//! [cleanup]
//! reduce_duplicates = true
//! keep = "most_complete"
//! extract_constants = true
//! count_missing_as_value = true
//! new_label = "metadata"
//!
//! [csv]
//! delimiter = ","
//! missing_tokens = ["", "NaN", "nan", "NA", "null"]
//! ```
//!
//! Every field is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{CleanupError, CleanupResult};
use crate::parsing::csv_parser::{CsvOptions, DEFAULT_MISSING_TOKENS};
use crate::transformations::{DuplicateKeep, ExtractOptions};

/// Cleanup configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanupConfig {
    #[serde(default)]
    pub cleanup: CleanupSettings,
    #[serde(default)]
    pub csv: CsvSettings,
}

/// Which cleanup steps run and how.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupSettings {
    #[serde(default = "default_true")]
    pub reduce_duplicates: bool,
    #[serde(default = "default_keep")]
    pub keep: String,
    #[serde(default = "default_true")]
    pub extract_constants: bool,
    #[serde(default = "default_true")]
    pub count_missing_as_value: bool,
    #[serde(default)]
    pub new_label: Option<String>,
}

/// Delimited-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvSettings {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default = "default_missing_tokens")]
    pub missing_tokens: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_keep() -> String {
    "most_complete".to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_missing_tokens() -> Vec<String> {
    DEFAULT_MISSING_TOKENS.iter().map(|s| s.to_string()).collect()
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            reduce_duplicates: true,
            keep: default_keep(),
            extract_constants: true,
            count_missing_as_value: true,
            new_label: None,
        }
    }
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            missing_tokens: default_missing_tokens(),
        }
    }
}

impl CleanupConfig {
    /// Load cleanup configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(CleanupConfig)` if successful
    /// * `Err(CleanupError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> CleanupResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            CleanupError::ConfigurationError(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse cleanup configuration from TOML text.
    pub fn from_toml_str(content: &str) -> CleanupResult<Self> {
        toml::from_str(content).map_err(|e| {
            CleanupError::ConfigurationError(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load cleanup configuration from the default location.
    ///
    /// Searches for `chiptools.toml` in:
    /// 1. Current directory
    /// 2. Parent directory
    pub fn from_default_location() -> CleanupResult<Self> {
        let search_paths = vec![
            PathBuf::from("chiptools.toml"),
            PathBuf::from("./chiptools.toml"),
            PathBuf::from("../chiptools.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(CleanupError::ConfigurationError(
            "No chiptools.toml found in standard locations".to_string(),
        ))
    }

    /// Get the duplicate keep strategy from configuration.
    pub fn keep_strategy(&self) -> CleanupResult<DuplicateKeep> {
        self.cleanup.keep.parse().map_err(|e| {
            CleanupError::ConfigurationError(format!("Invalid 'cleanup.keep': {}", e))
        })
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            new_label: self.cleanup.new_label.clone(),
            count_missing_as_value: self.cleanup.count_missing_as_value,
        }
    }

    /// Convert to CSV reader options. The delimiter must be a single ASCII
    /// character.
    pub fn csv_options(&self) -> CleanupResult<CsvOptions> {
        if !self.csv.delimiter.is_ascii() {
            return Err(CleanupError::ConfigurationError(format!(
                "'csv.delimiter' must be an ASCII character, got '{}'",
                self.csv.delimiter
            )));
        }

        Ok(CsvOptions {
            delimiter: self.csv.delimiter as u8,
            missing_tokens: self.csv.missing_tokens.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CleanupConfig::from_toml_str("").unwrap();

        assert!(config.cleanup.reduce_duplicates);
        assert!(config.cleanup.extract_constants);
        assert_eq!(config.keep_strategy().unwrap(), DuplicateKeep::MostComplete);
        assert_eq!(config.extract_options(), ExtractOptions::default());
        assert_eq!(config.csv_options().unwrap(), CsvOptions::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[cleanup]
reduce_duplicates = false
keep = "last"
extract_constants = true
count_missing_as_value = false
new_label = "metadata"

[csv]
delimiter = ";"
missing_tokens = ["-"]
"#;

        let config = CleanupConfig::from_toml_str(toml_content).unwrap();
        assert!(!config.cleanup.reduce_duplicates);
        assert_eq!(config.keep_strategy().unwrap(), DuplicateKeep::Last);

        let options = config.extract_options();
        assert_eq!(options.new_label.as_deref(), Some("metadata"));
        assert!(!options.count_missing_as_value);

        let csv = config.csv_options().unwrap();
        assert_eq!(csv.delimiter, b';');
        assert_eq!(csv.missing_tokens, vec!["-"]);
    }

    #[test]
    fn test_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[cleanup]\nkeep = \"first\"\n").unwrap();

        let config = CleanupConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.keep_strategy().unwrap(), DuplicateKeep::First);
        assert!(config.cleanup.extract_constants);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = CleanupConfig::from_file("/nonexistent/chiptools.toml").unwrap_err();
        assert!(matches!(err, CleanupError::ConfigurationError(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let err = CleanupConfig::from_toml_str("[cleanup\nkeep = 1").unwrap_err();
        assert!(matches!(err, CleanupError::ConfigurationError(_)));
    }

    #[test]
    fn test_unknown_keep_strategy() {
        let config = CleanupConfig::from_toml_str("[cleanup]\nkeep = \"largest\"").unwrap();
        let err = config.keep_strategy().unwrap_err();
        assert!(matches!(err, CleanupError::ConfigurationError(_)));
        assert!(err.to_string().contains("cleanup.keep"));
    }

    #[test]
    fn test_non_ascii_delimiter() {
        let config = CleanupConfig::from_toml_str("[csv]\ndelimiter = \"§\"").unwrap();
        assert!(config.csv_options().is_err());
    }
}
