//! User configuration loaded from `config.toml`.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculator::{Calculator, DEFAULT_PRECISION, LeadingZero, MAX_PRECISION};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Precision must be between 0 and {max}, got {0}", max = MAX_PRECISION)]
    Precision(u32),
}

/// Calculator settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Decimal places kept in real-valued results.
    pub precision: u32,
    /// Handling of symbols pressed on a fresh `0` display.
    pub leading_zero: LeadingZero,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            leading_zero: LeadingZero::default(),
        }
    }
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        if config.precision > MAX_PRECISION {
            return Err(ConfigError::Precision(config.precision));
        }
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Load a config file, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Render the settings as a TOML document.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Create a calculator using these settings.
    pub fn calculator(&self) -> Calculator {
        Calculator::new()
            .with_precision(self.precision)
            .with_leading_zero(self.leading_zero)
    }
}

/// `<config dir>/zcalc/config.toml`, e.g. `~/.config/zcalc/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("zcalc").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Key;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.leading_zero, LeadingZero::Replace);
    }

    #[test]
    fn test_parse_all_fields() {
        let config = Config::from_toml("precision = 4\nleading_zero = \"append\"\n").unwrap();
        assert_eq!(config.precision, 4);
        assert_eq!(config.leading_zero, LeadingZero::Append);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_toml("precision = 40"),
            Err(ConfigError::Precision(40))
        ));
        assert!(matches!(
            Config::from_toml("leading_zero = \"drop\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::from_toml("theme = \"dark\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rendered_config_parses_back() {
        let config = Config {
            precision: 3,
            leading_zero: LeadingZero::Append,
        };
        let text = config.to_toml().unwrap();
        assert!(text.contains("leading_zero = \"append\""));
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "precision = 2").unwrap();

        let config = Config::load(&path).unwrap();
        let mut calc = config.calculator();
        for key in [
            Key::digit(1).unwrap(),
            Key::Divide,
            Key::digit(3).unwrap(),
            Key::Equals,
        ] {
            calc.press(key);
        }
        assert_eq!(calc.display(), "0.33");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Read { .. })
        ));
    }
}
