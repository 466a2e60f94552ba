//! Common error types for the correlated logging crates.

use std::fmt;

/// A specialized Result type for context and logging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for context and logging operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A scope value was written while no scope was active.
    #[error("no active scope: `{key}` cannot be set outside of a unit of work")]
    NoActiveScope { key: String },

    /// The log sink rejected a record.
    #[error("sink write failed: {0}")]
    SinkWrite(#[source] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new no-active-scope error for `key`.
    pub fn no_active_scope(key: impl Into<String>) -> Self {
        Error::NoActiveScope { key: key.into() }
    }

    /// Wrap an I/O failure raised by a sink.
    pub fn sink_write(err: std::io::Error) -> Self {
        Error::SinkWrite(err)
    }

    /// Create a new configuration error.
    pub fn config(msg: impl fmt::Display) -> Self {
        Error::Config(msg.to_string())
    }

    /// Whether this error came from the sink rather than from scope misuse.
    pub fn is_sink_failure(&self) -> bool {
        matches!(self, Error::SinkWrite(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_active_scope_message_names_key() {
        let err = Error::no_active_scope("tenant");
        assert!(err.to_string().contains("`tenant`"));
        assert!(!err.is_sink_failure());
    }

    #[test]
    fn test_sink_write_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = Error::sink_write(io);
        assert!(err.is_sink_failure());
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("pipe closed"));
    }
}
