//! Structured JSON logging with ambient correlation ids.
//!
//! Every record is a single JSON line with a fixed schema:
//!
//! ```text
//! {"timestamp": <ISO-8601>, "level": <string>, "message": <any>,
//!  "correlationId": <string|null>, "context": <string|null>, ...metadata}
//! ```
//!
//! `correlationId` is read from the scope active on the calling execution
//! path (see the `request-context` crate), so callers never pass it.
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use structured_logger::{StructuredLogger, metadata};
//!
//! # async fn example() -> common::Result<()> {
//! let logger = StructuredLogger::from_env().with_context("Orders");
//!
//! request_context::run_in_scope("req-42", async {
//!     logger.info("order accepted", None, Some(metadata(json!({"orderId": 7}))))
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Levels
//!
//! `error`, `warn`, `info`, `verbose`, `debug`, most severe first. The
//! process threshold comes from `LOG_LEVEL` (default `info`); records below
//! it are dropped without being serialized.

pub mod config;
pub mod layer;
pub mod level;
pub mod logger;
pub mod message;
pub mod record;
pub mod sink;

pub use config::{LoggerConfig, SinkConfig};
pub use layer::StructuredLayer;
pub use level::{Level, ParseLevelError};
pub use logger::{StructuredLogger, global, init_global};
pub use message::{IntoMessage, Message, Metadata, Structured, metadata};
pub use record::{FallbackRecord, LogRecord};
pub use sink::{FileSink, MemorySink, Sink, StderrSink, StdoutSink, WriterSink};
