//! The canonical record schema.
//!
//! Every line written by the emitter is one of two shapes:
//!
//! ```text
//! {"timestamp":"2026-01-21T14:30:45.123Z","level":"info","message":"...",
//!  "correlationId":"req-42","context":"OrderService", ...metadata}
//!
//! {"timestamp":"2026-01-21T14:30:45.123Z","level":"error",
//!  "error":"unserializable message","correlationId":"req-42"}
//! ```

use crate::level::Level;
use crate::message::{Message, Metadata};
use serde::Serialize;
use serde_json::json;

/// Keys owned by the record itself; metadata cannot override them.
pub const RESERVED_KEYS: [&str; 5] = ["timestamp", "level", "message", "correlationId", "context"];

/// Error text of the fallback record.
pub const UNSERIALIZABLE_MESSAGE: &str = "unserializable message";

/// One log line before serialization.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: Level,
    pub message: Message,
    #[serde(rename = "correlationId")]
    pub correlation_id: Option<String>,
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
    #[serde(flatten)]
    pub metadata: Metadata,
}

impl LogRecord {
    /// Create a record stamped with the current time.
    pub fn new(level: Level, message: Message, correlation_id: Option<String>) -> Self {
        Self {
            timestamp: now_timestamp(),
            level,
            message,
            correlation_id,
            context: None,
            trace: None,
            metadata: Metadata::new(),
        }
    }

    /// Set the context label.
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }

    /// Attach an error trace.
    pub fn with_trace(mut self, trace: Option<String>) -> Self {
        self.trace = trace;
        self
    }

    /// Merge metadata at the top level, dropping keys the record owns.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        let has_trace = self.trace.is_some();
        self.metadata = metadata
            .into_iter()
            .filter(|(key, _)| !is_reserved(key, has_trace))
            .collect();
        self
    }

    /// Serialize to one newline-terminated JSON line.
    pub fn to_line(&self) -> Result<Vec<u8>, serde_json::Error> {
        to_line(self)
    }
}

/// Minimal record written when a message cannot be serialized.
#[derive(Debug, Clone, Serialize)]
pub struct FallbackRecord {
    pub timestamp: String,
    pub level: Level,
    pub error: &'static str,
    #[serde(rename = "correlationId")]
    pub correlation_id: Option<String>,
}

impl FallbackRecord {
    pub fn new(correlation_id: Option<String>) -> Self {
        Self {
            timestamp: now_timestamp(),
            level: Level::Error,
            error: UNSERIALIZABLE_MESSAGE,
            correlation_id,
        }
    }

    /// Serialize to one newline-terminated JSON line.
    pub fn to_line(&self) -> Vec<u8> {
        let mut line = json!({
            "timestamp": self.timestamp,
            "level": self.level.as_str(),
            "error": self.error,
            "correlationId": self.correlation_id,
        })
        .to_string();
        line.push('\n');
        line.into_bytes()
    }
}

fn to_line<T: Serialize>(record: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    Ok(line)
}

fn is_reserved(key: &str, has_trace: bool) -> bool {
    RESERVED_KEYS.contains(&key) || (has_trace && key == "trace")
}

/// Wall-clock time in RFC 3339 with millisecond precision, UTC.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
