//! Bridge from `tracing` events to structured records.
//!
//! Libraries that log through `tracing` (tower-http, hyper, our own crates)
//! end up in the same stream, in the same schema, tagged with the same
//! correlation id as records emitted through [`StructuredLogger`].

use crate::level::Level;
use crate::logger::{DIAGNOSTICS_TARGET, StructuredLogger};
use crate::message::Metadata;
use serde_json::Value;
use std::fmt::Write as FmtWrite;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// A tracing layer that writes every event as a structured record.
///
/// The event target becomes the `context` label and event fields become
/// metadata. Enclosing span names are listed under `span`.
pub struct StructuredLayer {
    logger: StructuredLogger,
}

impl StructuredLayer {
    pub fn new(logger: StructuredLogger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }
}

impl<S> Layer<S> for StructuredLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if target == DIAGNOSTICS_TARGET {
            return;
        }

        let level = Level::from_tracing(metadata.level());
        if !self.logger.enabled(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let mut fields = visitor.fields;

        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<&str> = scope.from_root().map(|span| span.name()).collect();
            if !spans.is_empty() {
                fields.insert("span".to_string(), Value::String(spans.join(" > ")));
            }
        }

        let message = visitor.message.unwrap_or_default();

        // Sink failures cannot be reported from inside the subscriber.
        let _ = self.logger.log(level, message, Some(target), Some(fields));
    }
}

/// Collects the message and fields of one event.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Metadata,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{:?}", value);

        if field.name() == "message" {
            self.message = Some(buf);
        } else {
            self.insert(field, Value::String(buf));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::Number(value.into()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(n) = serde_json::Number::from_f64(value) {
            self.insert(field, Value::Number(n));
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, Value::String(value.to_string()));
    }
}
