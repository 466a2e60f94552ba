//! Severity settings shared by the structured logger and the `tracing`
//! subscriber that feeds it.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the minimum severity name.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Filter for the process's `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise the severity named by `LOG_LEVEL`
/// decides, defaulting to info.
pub fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var(LOG_LEVEL_ENV).ok();
        EnvFilter::new(filter_directive(level.as_deref()))
    })
}

/// Map a severity name onto the nearest `tracing` level directive.
///
/// `verbose` sits between info and debug, so it opens `debug`; `debug` is the
/// most detailed severity and opens `trace`. Unknown names fall back to info.
pub fn filter_directive(level: Option<&str>) -> &'static str {
    match level.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
        Some("error") => "error",
        Some("warn") => "warn",
        Some("verbose") => "debug",
        Some("debug") => "trace",
        _ => "info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_known_levels() {
        assert_eq!(filter_directive(Some("error")), "error");
        assert_eq!(filter_directive(Some("WARN")), "warn");
        assert_eq!(filter_directive(Some(" verbose ")), "debug");
        assert_eq!(filter_directive(Some("debug")), "trace");
    }

    #[test]
    fn test_filter_directive_fails_open() {
        assert_eq!(filter_directive(None), "info");
        assert_eq!(filter_directive(Some("loud")), "info");
        assert_eq!(filter_directive(Some("")), "info");
    }
}
