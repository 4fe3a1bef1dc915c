//! Structured logging settings.

use crate::config::LoggingSettings;
use crate::{Error, Result};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "ISACONV_LOG";

/// Default filter directive.
pub const DEFAULT_LEVEL: &str = "info";

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-line.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(Error::InvalidInput(format!(
                "unknown log format '{other}', expected 'pretty' or 'json'"
            ))),
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Event filter.
    pub filter: EnvFilter,
    /// Log file; stderr when absent.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Resolves settings from the config file, the `-v` flag and
    /// `ISACONV_LOG`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown format or an invalid
    /// filter directive.
    pub fn from_settings(settings: &LoggingSettings, verbose: bool) -> Result<Self> {
        let env = std::env::var(LOG_ENV).ok();
        Self::resolve(settings, verbose, env.as_deref())
    }

    fn resolve(settings: &LoggingSettings, verbose: bool, env: Option<&str>) -> Result<Self> {
        let format = settings
            .format
            .as_deref()
            .map_or(Ok(LogFormat::default()), LogFormat::from_str)?;
        let directive = filter_directive(settings.level.as_deref(), verbose, env);
        let filter = EnvFilter::try_new(directive)
            .map_err(|e| Error::InvalidInput(format!("invalid log filter '{directive}': {e}")))?;

        Ok(Self {
            format,
            filter,
            file: settings.file.clone(),
        })
    }
}

/// Picks the filter directive: `ISACONV_LOG`, then `-v`, then the
/// configured level.
fn filter_directive<'a>(configured: Option<&'a str>, verbose: bool, env: Option<&'a str>) -> &'a str {
    if let Some(env) = env.filter(|value| !value.trim().is_empty()) {
        return env;
    }
    if verbose {
        return "debug";
    }
    configured.unwrap_or(DEFAULT_LEVEL)
}
