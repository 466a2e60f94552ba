//! Log severities and threshold comparison.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Log severity, ordered from most to least severe.
///
/// A record is written when its level is at or above the configured
/// threshold, i.e. `level <= threshold` in this ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warn,
    #[default]
    Info,
    Verbose,
    Debug,
}

impl Level {
    /// All levels, most severe first.
    pub const ALL: [Level; 5] = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Verbose,
        Level::Debug,
    ];

    /// Lowercase name used in records and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Verbose => "verbose",
            Level::Debug => "debug",
        }
    }

    /// Whether a record at this level passes `threshold`.
    pub fn passes(self, threshold: Level) -> bool {
        self <= threshold
    }

    /// Parse a level name, falling back to [`Level::Info`] for anything
    /// unrecognized.
    pub fn parse_or_default(raw: &str) -> Level {
        raw.parse().unwrap_or_default()
    }

    /// Nearest level for a `tracing` event.
    ///
    /// TRACE has no counterpart of its own and lands on `debug`.
    pub fn from_tracing(level: &tracing::Level) -> Level {
        match *level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG | tracing::Level::TRACE => Level::Debug,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized level name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level `{0}` (expected error, warn, info, verbose or debug)")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

impl From<ParseLevelError> for common::Error {
    fn from(err: ParseLevelError) -> Self {
        common::Error::config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Error.to_string(), "error");
        assert_eq!(Level::Warn.to_string(), "warn");
        assert_eq!(Level::Info.to_string(), "info");
        assert_eq!(Level::Verbose.to_string(), "verbose");
        assert_eq!(Level::Debug.to_string(), "debug");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("WARN".parse::<Level>(), Ok(Level::Warn));
        assert_eq!(" verbose ".parse::<Level>(), Ok(Level::Verbose));
        assert!("trace".parse::<Level>().is_err());
    }

    #[test]
    fn test_parse_or_default_fails_open() {
        assert_eq!(Level::parse_or_default("debug"), Level::Debug);
        assert_eq!(Level::parse_or_default("chatty"), Level::Info);
        assert_eq!(Level::parse_or_default(""), Level::Info);
    }

    #[test]
    fn test_threshold_ordering() {
        assert!(Level::Error.passes(Level::Warn));
        assert!(Level::Warn.passes(Level::Warn));
        assert!(!Level::Info.passes(Level::Warn));
        assert!(!Level::Verbose.passes(Level::Info));
        assert!(Level::Verbose.passes(Level::Debug));
        assert!(Level::ALL.iter().all(|l| l.passes(Level::Debug)));
    }

    #[test]
    fn test_tracing_mapping() {
        assert_eq!(Level::from_tracing(&tracing::Level::ERROR), Level::Error);
        assert_eq!(Level::from_tracing(&tracing::Level::INFO), Level::Info);
        assert_eq!(Level::from_tracing(&tracing::Level::TRACE), Level::Debug);
    }
}
