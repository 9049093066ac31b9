//! Configuration schema (itinerary.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the style settings file
pub const DEFAULT_SETTINGS_PATH: &str = "./user_settings.txt";

/// Output rendering mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Raw replacement values, no escape sequences
    #[default]
    Plain,

    /// Replacement values wrapped in ANSI escape sequences
    Styled,
}

impl OutputMode {
    pub fn from_styled(styled: bool) -> Self {
        if styled {
            Self::Styled
        } else {
            Self::Plain
        }
    }

    pub fn is_styled(self) -> bool {
        self == Self::Styled
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Styled => write!(f, "styled"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Airport reference table (CSV)
    #[serde(default)]
    pub lookup: Option<PathBuf>,

    /// Style settings file
    #[serde(default = "default_settings_path")]
    pub settings: PathBuf,

    /// Render replacements with terminal styling
    #[serde(default)]
    pub styled: bool,

    /// Write a JSON run report here
    #[serde(default)]
    pub report: Option<PathBuf>,

    /// Append log output to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Directory containing the config file (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

fn default_settings_path() -> PathBuf {
    PathBuf::from(DEFAULT_SETTINGS_PATH)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lookup: None,
            settings: default_settings_path(),
            styled: false,
            report: None,
            log_file: None,
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.display().to_string(), e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Relative paths in the file are relative to the file itself
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let mut config: Config =
            toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.project_root = std::env::current_dir().unwrap_or_default();
        Ok(config)
    }

    /// Output mode selected by the `styled` switch
    pub fn mode(&self) -> OutputMode {
        OutputMode::from_styled(self.styled)
    }

    /// Resolve a configured path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.project_root.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {0}: {1}")]
    IoError(String, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.settings, PathBuf::from(DEFAULT_SETTINGS_PATH));
        assert_eq!(config.mode(), OutputMode::Plain);
        assert!(config.lookup.is_none());
    }

    #[test]
    fn parse_toml() {
        let config = Config::from_toml(
            r#"
            lookup = "data/airport-lookup.csv"
            styled = true
            report = "report.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.lookup, Some(PathBuf::from("data/airport-lookup.csv")));
        assert_eq!(config.mode(), OutputMode::Styled);
        assert_eq!(config.settings, PathBuf::from(DEFAULT_SETTINGS_PATH));
    }

    #[test]
    fn unknown_mode_value_is_rejected() {
        let err = Config::from_toml("styled = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn from_file_sets_project_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("itinerary.toml");
        std::fs::write(&path, "lookup = \"airports.csv\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.project_root, dir.path());
        assert_eq!(config.resolve(Path::new("airports.csv")), dir.path().join("airports.csv"));
    }

    #[test]
    fn missing_file_names_path() {
        let err = Config::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
