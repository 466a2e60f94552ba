//! Correlation Server - HTTP entry point for correlated structured logging
//!
//! Each inbound request is one unit of work. The correlation middleware
//! forwards the caller's `x-correlation-id` (or mints a UUID), runs the
//! request inside a scope carrying it, and echoes it on the response. Every
//! record written while the request is handled, including records from
//! spawned subtasks and from `tracing` events, carries that id.
//!
//! # Components
//!
//! - **Config**: YAML file plus `LOG_LEVEL` override
//! - **Middleware**: establishes the per-request scope
//! - **CorrelationServer**: axum router and listener
//! - **Startup**: resolves settings and reports problems once logging is up
//! - **Telemetry**: bridges `tracing` into the structured logger

pub mod config;
pub mod http_server;
pub mod middleware;
pub mod startup;
pub mod telemetry;

pub use config::{Config, ConfigError};
pub use http_server::{CorrelationServer, ServerError, router};
pub use startup::Startup;
pub use telemetry::init_tracing;
