//! Correlation id generation and validation for inbound units of work.

use uuid::Uuid;

/// Longest correlation id accepted from a caller.
pub const MAX_CORRELATION_ID_LEN: usize = 128;

/// Generate a fresh correlation id (UUID v4).
pub fn new_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Accept a caller-supplied correlation id if it is safe to echo into logs.
///
/// Surrounding whitespace is trimmed. The remainder must be 1 to
/// [`MAX_CORRELATION_ID_LEN`] visible ASCII characters.
pub fn sanitize_correlation_id(candidate: &str) -> Option<&str> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_CORRELATION_ID_LEN {
        return None;
    }
    trimmed
        .bytes()
        .all(|b| b.is_ascii_graphic())
        .then_some(trimmed)
}

/// Forward a valid inbound id, or mint a new one.
pub fn resolve_correlation_id(inbound: Option<&str>) -> String {
    inbound
        .and_then(sanitize_correlation_id)
        .map(str::to_string)
        .unwrap_or_else(new_correlation_id)
}
