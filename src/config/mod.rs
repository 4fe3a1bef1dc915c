//! Configuration management.
//!
//! # Sources
//!
//! The first of these that exists wins; there is no merging between files:
//!
//! 1. `--config <path>`
//! 2. `ISACONV_CONFIG_PATH`
//! 3. `<platform config dir>/isaconv/config.toml`
//! 4. Built-in defaults
//!
//! CLI flags override whatever the file says.
//!
//! # Example
//!
//! ```toml
//! [conversion]
//! validate_first = true
//! use_new_parser = false
//!
//! [output]
//! pretty_json = true
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! file = "/var/log/isaconv.log"
//! ```

use crate::convert::ConvertOptions;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file.
pub const CONFIG_PATH_ENV: &str = "ISACONV_CONFIG_PATH";

/// Main configuration for isaconv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsaConfig {
    /// Conversion defaults.
    pub conversion: ConvertOptions,
    /// Pretty-print JSON output.
    pub pretty_json: bool,
    /// Logging settings, interpreted by [`crate::observability`].
    pub logging: LoggingSettings,
}

/// Logging settings as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct LoggingSettings {
    /// Tracing filter directive, e.g. `info` or `isaconv=debug`.
    pub level: Option<String>,
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Log file; stderr when absent.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Conversion section.
    pub conversion: Option<ConfigFileConversion>,
    /// Output section.
    pub output: Option<ConfigFileOutput>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Conversion section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileConversion {
    /// Run the validation gate.
    pub validate_first: Option<bool>,
    /// Use the fast parser.
    pub use_new_parser: Option<bool>,
}

/// Output section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileOutput {
    /// Pretty-print JSON.
    pub pretty_json: Option<bool>,
}

impl Default for IsaConfig {
    fn default() -> Self {
        Self {
            conversion: ConvertOptions::default(),
            pretty_json: true,
            logging: LoggingSettings::default(),
        }
    }
}

impl IsaConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the first available source.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file (argument or
    /// `ISACONV_CONFIG_PATH`) cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_PATH_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self::resolve(explicit, from_env.as_deref())
    }

    fn resolve(explicit: Option<&Path>, from_env: Option<&Path>) -> Result<Self> {
        match explicit.or(from_env) {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::load_default()),
        }
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and
    /// [`Error::InvalidInput`] if it is not valid TOML.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::io("read_config_file", path, &e))?;

        let file: ConfigFile = toml::from_str(&contents)
            .map_err(|e| Error::InvalidInput(format!("{}: {e}", path.display())))?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the platform config directory
    /// (`~/.config/isaconv/config.toml` on Linux).
    ///
    /// Returns default configuration if no readable config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let path = base_dirs.config_dir().join("isaconv").join("config.toml");
        if path.is_file()
            && let Ok(config) = Self::load_from_file(&path)
        {
            return config;
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `IsaConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(conversion) = file.conversion {
            if let Some(v) = conversion.validate_first {
                config.conversion.validate_first = v;
            }
            if let Some(v) = conversion.use_new_parser {
                config.conversion.use_new_parser = v;
            }
        }
        if let Some(v) = file.output.and_then(|output| output.pretty_json) {
            config.pretty_json = v;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }
}
