//! Startup sequence: settings resolved before any logger exists, reported
//! once one does.

use crate::config::{Config, ConfigError};
use serde_json::json;
use std::path::PathBuf;
use structured_logger::{LoggerConfig, StructuredLogger, metadata};

const STARTUP_CONTEXT: &str = "Main";

/// Resolved settings plus the problems met while resolving them.
#[derive(Debug)]
pub struct Startup {
    pub config: Config,
    pub logger_config: LoggerConfig,
    source: Option<PathBuf>,
    load_error: Option<ConfigError>,
    level_error: Option<common::Error>,
}

impl Startup {
    /// Resolve settings from the config search paths and `LOG_LEVEL`.
    pub fn load() -> Self {
        let raw = std::env::var(structured_logger::config::LOG_LEVEL_ENV).ok();
        Self::from_parts(Config::load_with_source(), raw.as_deref())
    }

    /// Resolve settings from an already attempted load.
    ///
    /// A failed load falls back to the default configuration.
    pub fn from_parts(
        loaded: Result<(Config, Option<PathBuf>), ConfigError>,
        level_override: Option<&str>,
    ) -> Self {
        let (config, source, load_error) = match loaded {
            Ok((config, source)) => (config, source, None),
            Err(e) => (Config::default(), None, Some(e)),
        };
        let (logger_config, level_error) = config.resolve_logger_config(level_override);

        Self {
            config,
            logger_config,
            source,
            load_error,
            level_error,
        }
    }

    /// Write what happened during resolution through `logger`.
    pub fn report(&self, logger: &StructuredLogger) -> common::Result<()> {
        match (&self.load_error, &self.source) {
            (Some(e), _) => logger.warn(
                "Configuration error, using defaults",
                Some(STARTUP_CONTEXT),
                Some(metadata(json!({ "error": e.to_string() }))),
            )?,
            (None, Some(path)) => logger.info(
                "Loaded configuration",
                Some(STARTUP_CONTEXT),
                Some(metadata(json!({ "path": path.display().to_string() }))),
            )?,
            (None, None) => logger.info(
                "No configuration file found, using defaults",
                Some(STARTUP_CONTEXT),
                None,
            )?,
        }

        if let Some(e) = &self.level_error {
            logger.warn(
                "Ignoring log level override",
                Some(STARTUP_CONTEXT),
                Some(metadata(json!({
                    "error": e.to_string(),
                    "threshold": logger.threshold().as_str(),
                }))),
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use structured_logger::{Level, MemorySink};

    fn memory_logger() -> (StructuredLogger, std::sync::Arc<MemorySink>) {
        let sink = MemorySink::shared();
        (StructuredLogger::new(sink.clone(), Level::Debug), sink)
    }

    #[test]
    fn test_rejected_level_is_reported() {
        let startup = Startup::from_parts(Ok((Config::default(), None)), Some("shouty"));
        assert_eq!(startup.logger_config.level, Level::Info);

        let (logger, sink) = memory_logger();
        startup.report(&logger).unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["message"], "No configuration file found, using defaults");
        assert_eq!(records[1]["level"], "warn");
        assert_eq!(records[1]["message"], "Ignoring log level override");
        assert_eq!(records[1]["context"], "Main");
        assert!(records[1]["error"].as_str().unwrap().contains("shouty"));
    }

    #[test]
    fn test_config_source_is_reported() {
        let loaded = Ok((Config::default(), Some(PathBuf::from("/etc/app.yaml"))));
        let startup = Startup::from_parts(loaded, Some("debug"));
        assert_eq!(startup.logger_config.level, Level::Debug);

        let (logger, sink) = memory_logger();
        startup.report(&logger).unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["message"], "Loaded configuration");
        assert_eq!(records[0]["path"], "/etc/app.yaml");
    }

    #[test]
    fn test_load_failure_falls_back_and_is_reported() {
        let err = Config::from_yaml("server: [unclosed").unwrap_err();
        let startup = Startup::from_parts(Err(err), None);
        assert_eq!(startup.config.server.listen_addr, "127.0.0.1:8080");

        let (logger, sink) = memory_logger();
        startup.report(&logger).unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["level"], "warn");
        assert_eq!(records[0]["message"], "Configuration error, using defaults");
        assert!(records[0]["error"].as_str().unwrap().contains("YAML"));
    }
}
