//! The structured emitter.

use crate::config::LoggerConfig;
use crate::level::Level;
use crate::message::{IntoMessage, Metadata};
use crate::record::{FallbackRecord, LogRecord};
use crate::sink::{Sink, StdoutSink};
use common::{Error, Result};
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Target of the emitter's own diagnostics, which the tracing bridge never
/// feeds back into the logger.
pub(crate) const DIAGNOSTICS_TARGET: &str = "structured_logger::logger";

static GLOBAL: OnceLock<StructuredLogger> = OnceLock::new();

/// Emits records in the canonical schema, tagged with the ambient
/// correlation id.
///
/// Cloning is cheap; clones share the sink.
#[derive(Clone)]
pub struct StructuredLogger {
    sink: Arc<dyn Sink>,
    threshold: Level,
    default_context: Option<Arc<str>>,
}

impl StructuredLogger {
    /// Create a logger writing to `sink`, dropping records below `threshold`.
    pub fn new(sink: Arc<dyn Sink>, threshold: Level) -> Self {
        Self {
            sink,
            threshold,
            default_context: None,
        }
    }

    /// Logger on stdout with the threshold taken from `LOG_LEVEL`.
    pub fn from_env() -> Self {
        Self::new(Arc::new(StdoutSink), LoggerConfig::from_env().level)
    }

    /// Build a logger from configuration, opening its sink.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        let sink = config.sink.open().map_err(Error::sink_write)?;
        let mut logger = Self::new(sink, config.level);
        logger.default_context = config.default_context.as_deref().map(Arc::from);
        Ok(logger)
    }

    /// A logger sharing this one's sink and threshold, labelled `context`.
    pub fn with_context(&self, context: impl AsRef<str>) -> Self {
        Self {
            sink: self.sink.clone(),
            threshold: self.threshold,
            default_context: Some(Arc::from(context.as_ref())),
        }
    }

    /// Default context label.
    pub fn context(&self) -> Option<&str> {
        self.default_context.as_deref()
    }

    pub fn threshold(&self) -> Level {
        self.threshold
    }

    /// Whether a record at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level.passes(self.threshold)
    }

    pub fn info(
        &self,
        message: impl IntoMessage,
        context: Option<&str>,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        self.emit(Level::Info, message, None, context, metadata)
    }

    /// Emit an error record, with an optional stack trace under `trace`.
    pub fn error(
        &self,
        message: impl IntoMessage,
        trace: Option<&str>,
        context: Option<&str>,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        self.emit(Level::Error, message, trace, context, metadata)
    }

    pub fn warn(
        &self,
        message: impl IntoMessage,
        context: Option<&str>,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        self.emit(Level::Warn, message, None, context, metadata)
    }

    pub fn debug(
        &self,
        message: impl IntoMessage,
        context: Option<&str>,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        self.emit(Level::Debug, message, None, context, metadata)
    }

    pub fn verbose(
        &self,
        message: impl IntoMessage,
        context: Option<&str>,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        self.emit(Level::Verbose, message, None, context, metadata)
    }

    /// Emit at an arbitrary level.
    pub fn log(
        &self,
        level: Level,
        message: impl IntoMessage,
        context: Option<&str>,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        self.emit(level, message, None, context, metadata)
    }

    fn emit(
        &self,
        level: Level,
        message: impl IntoMessage,
        trace: Option<&str>,
        context: Option<&str>,
        metadata: Option<Metadata>,
    ) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }

        let correlation_id = request_context::correlation_id();
        let line = match self.render(level, message, trace, context, metadata, &correlation_id) {
            Ok(line) => line,
            Err(e) => {
                debug!(target: DIAGNOSTICS_TARGET, error = %e, level = %level, "Log message could not be serialized");
                FallbackRecord::new(correlation_id).to_line()
            }
        };

        self.sink.write_record(&line).map_err(Error::sink_write)
    }

    fn render(
        &self,
        level: Level,
        message: impl IntoMessage,
        trace: Option<&str>,
        context: Option<&str>,
        metadata: Option<Metadata>,
        correlation_id: &Option<String>,
    ) -> Result<Vec<u8>> {
        let message = message.into_message()?;
        let context = context.or(self.context()).map(str::to_string);

        let record = LogRecord::new(level, message, correlation_id.clone())
            .with_context(context)
            .with_trace(trace.map(str::to_string))
            .with_metadata(metadata.unwrap_or_default());

        Ok(record.to_line()?)
    }
}

impl fmt::Debug for StructuredLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredLogger")
            .field("threshold", &self.threshold)
            .field("default_context", &self.default_context)
            .finish_non_exhaustive()
    }
}

/// Install the process-wide logger.
///
/// Succeeds once per process; later calls hand the rejected logger back. The
/// installed logger lives until the process exits.
pub fn init_global(logger: StructuredLogger) -> std::result::Result<(), StructuredLogger> {
    GLOBAL.set(logger)
}

/// The process-wide logger.
///
/// Falls back to [`StructuredLogger::from_env`] on first use when
/// [`init_global`] was never called, so `LOG_LEVEL` is read at most once.
pub fn global() -> &'static StructuredLogger {
    GLOBAL.get_or_init(StructuredLogger::from_env)
}
