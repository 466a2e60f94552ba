//! Process-wide access to the scope active on the calling execution path.

use crate::scope::{CORRELATION_ID_KEY, Scope};
use common::{Error, Result};
use serde_json::Value;
use std::future::Future;
use tracing::{debug, trace};

tokio::task_local! {
    /// `None` marks work that was explicitly started outside any unit of work.
    pub(crate) static ACTIVE_SCOPE: Option<Scope>;
}

/// Run `fut` inside a new scope carrying `correlation_id`.
///
/// Returns whatever `fut` returns; errors and panics pass through untouched.
/// Nested calls shadow the outer scope until they complete.
pub async fn run_in_scope<F: Future>(correlation_id: impl Into<String>, fut: F) -> F::Output {
    let scope = Scope::new(correlation_id);
    trace!(correlation_id = ?scope.correlation_id(), "Entering scope");
    scope.run(fut).await
}

/// Run the synchronous closure `f` inside a new scope carrying `correlation_id`.
pub fn run_in_scope_sync<R>(correlation_id: impl Into<String>, f: impl FnOnce() -> R) -> R {
    Scope::new(correlation_id).enter(f)
}

/// Value stored under `key` in the active scope.
///
/// `None` when no scope is active or the key was never set.
pub fn get(key: &str) -> Option<Value> {
    ACTIVE_SCOPE
        .try_with(|scope| scope.as_ref().and_then(|s| s.get(key)))
        .ok()
        .flatten()
}

/// Store `value` under `key` in the active scope.
///
/// The write is visible to every continuation that shares the scope,
/// including subtasks that were already spawned.
pub fn set(key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
    let key = key.into();
    match current() {
        Some(scope) => {
            scope.set(key, value);
            Ok(())
        }
        None => {
            debug!(key = %key, "Rejected scope write outside of a unit of work");
            Err(Error::no_active_scope(key))
        }
    }
}

/// The active scope, if any.
pub fn current() -> Option<Scope> {
    Scope::current()
}

/// Whether a scope is active on the calling execution path.
pub fn is_active() -> bool {
    ACTIVE_SCOPE
        .try_with(|scope| scope.is_some())
        .unwrap_or(false)
}

/// Correlation id of the active scope.
pub fn correlation_id() -> Option<String> {
    ACTIVE_SCOPE
        .try_with(|scope| scope.as_ref().and_then(Scope::correlation_id))
        .ok()
        .flatten()
}
