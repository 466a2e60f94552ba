//! Correlation id middleware.
//!
//! Every inbound request becomes one unit of work: the middleware picks the
//! caller's correlation id (or mints one), runs the rest of the stack inside a
//! scope carrying it, and echoes it back on the response.

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use request_context::{Scope, resolve_correlation_id};
use tracing::debug;

/// Establish a scope for the request, keyed by the header named in `state`.
pub async fn correlation_scope(
    State(header): State<HeaderName>,
    request: Request,
    next: Next,
) -> Response {
    let inbound = request.headers().get(&header).and_then(|v| v.to_str().ok());
    let correlation_id = resolve_correlation_id(inbound);

    if inbound.is_some_and(|v| v.trim() != correlation_id) {
        debug!(header = %header, "Replaced unusable inbound correlation id");
    }

    let mut response = Scope::new(correlation_id.clone())
        .run(next.run(request))
        .await;

    // Accepted and generated ids are visible ASCII, so this cannot fail.
    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response.headers_mut().insert(header, value);
    }

    response
}
