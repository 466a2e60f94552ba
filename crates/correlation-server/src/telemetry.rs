//! Tracing setup for the correlation server
//!
//! Routes every `tracing` event (ours, axum's, tower-http's) through the
//! structured logger so the process emits a single JSON schema.

use structured_logger::{StructuredLayer, StructuredLogger};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Install the global tracing subscriber writing through `logger`.
///
/// `RUST_LOG` narrows which targets reach the logger; without it the filter
/// follows `LOG_LEVEL`.
pub fn init_tracing(logger: &StructuredLogger) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(common::logging::default_filter())
        .with(StructuredLayer::new(logger.clone()))
        .try_init()?;

    tracing::info!(threshold = %logger.threshold(), "Tracing initialized with structured output");

    Ok(())
}
