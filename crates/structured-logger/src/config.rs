//! Logger configuration.

use crate::level::Level;
use crate::sink::{FileSink, Sink, StderrSink, StdoutSink};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

pub use common::logging::LOG_LEVEL_ENV;

/// Where records are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkConfig {
    #[default]
    Stdout,
    Stderr,
    File(PathBuf),
}

impl SinkConfig {
    /// Open the configured sink.
    pub fn open(&self) -> io::Result<Arc<dyn Sink>> {
        Ok(match self {
            SinkConfig::Stdout => Arc::new(StdoutSink),
            SinkConfig::Stderr => Arc::new(StderrSink),
            SinkConfig::File(path) => Arc::new(FileSink::append(path)?),
        })
    }
}

/// Settings for a [`StructuredLogger`](crate::StructuredLogger).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Minimum severity written.
    #[serde(default)]
    pub level: Level,

    /// Context label used when a call does not supply one.
    #[serde(default)]
    pub default_context: Option<String>,

    #[serde(default)]
    pub sink: SinkConfig,
}

impl LoggerConfig {
    /// Defaults with `LOG_LEVEL` applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `LOG_LEVEL` on top of this configuration.
    pub fn with_env_overrides(self) -> Self {
        let raw = std::env::var(LOG_LEVEL_ENV).ok();
        self.with_level_override(raw.as_deref())
    }

    /// Apply a raw level name on top of this configuration.
    ///
    /// An unrecognized name keeps the configured level rather than failing.
    pub fn with_level_override(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            match raw.parse::<Level>() {
                Ok(level) => self.level = level,
                Err(e) => tracing::warn!(error = %e, level = %self.level, "Ignoring log level override"),
            }
        }
        self
    }

    /// Apply a raw level name, rejecting names that are not a level.
    pub fn try_with_level_override(self, raw: Option<&str>) -> common::Result<Self> {
        match raw {
            Some(raw) => Ok(self.with_level(raw.parse::<Level>()?)),
            None => Ok(self),
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_default_context(mut self, context: impl Into<String>) -> Self {
        self.default_context = Some(context.into());
        self
    }

    pub fn with_sink(mut self, sink: SinkConfig) -> Self {
        self.sink = sink;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.sink, SinkConfig::Stdout);
        assert!(config.default_context.is_none());
    }

    #[test]
    fn test_level_override() {
        let config = LoggerConfig::default().with_level_override(Some("warn"));
        assert_eq!(config.level, Level::Warn);

        let config = LoggerConfig::default().with_level_override(None);
        assert_eq!(config.level, Level::Info);
    }

    #[test]
    fn test_unrecognized_override_fails_open() {
        let config = LoggerConfig::default().with_level_override(Some("shouty"));
        assert_eq!(config.level, Level::Info);

        let config = LoggerConfig::default()
            .with_level(Level::Error)
            .with_level_override(Some("shouty"));
        assert_eq!(config.level, Level::Error);
    }

    #[test]
    fn test_strict_override_rejects_unknown_names() {
        let config = LoggerConfig::default()
            .try_with_level_override(Some("VERBOSE"))
            .unwrap();
        assert_eq!(config.level, Level::Verbose);

        let err = LoggerConfig::default()
            .try_with_level_override(Some("shouty"))
            .unwrap_err();
        assert!(matches!(err, common::Error::Config(ref msg) if msg.contains("shouty")));

        let config = LoggerConfig::default().try_with_level_override(None).unwrap();
        assert_eq!(config.level, Level::Info);
    }

    #[test]
    fn test_deserialize_sink_variants() {
        let config: LoggerConfig = serde_json::from_str(r#"{"sink":"stderr"}"#).unwrap();
        assert_eq!(config.sink, SinkConfig::Stderr);

        let config: LoggerConfig =
            serde_json::from_str(r#"{"level":"debug","sink":{"file":"/tmp/app.jsonl"}}"#).unwrap();
        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.sink, SinkConfig::File(PathBuf::from("/tmp/app.jsonl")));
    }

    #[test]
    fn test_open_file_sink() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("out.jsonl");

        let sink = SinkConfig::File(path.clone()).open().unwrap();
        sink.write_record(b"{}\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }
}
