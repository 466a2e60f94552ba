//! Correlation Server binary

use anyhow::Context;
use correlation_server::{CorrelationServer, Startup, init_tracing};
use structured_logger::{StructuredLogger, init_global};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Settings first; problems are reported once the logger exists
    let startup = Startup::load();

    let logger = StructuredLogger::from_config(&startup.logger_config)
        .context("failed to open log sink")?;
    if init_global(logger.clone()).is_err() {
        anyhow::bail!("structured logger already initialized");
    }

    init_tracing(&logger)?;

    startup.report(&logger)?;
    logger.info("Correlation server starting", Some("Main"), None)?;

    let server = CorrelationServer::new(logger, startup.config.server);
    server.run().await?;

    Ok(())
}
