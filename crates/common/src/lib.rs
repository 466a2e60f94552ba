//! Common utilities and types shared across the correlated logging crates.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
