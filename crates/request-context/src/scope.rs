//! Scope handle for one unit of work.

use crate::spawn::Scoped;
use crate::store::ACTIVE_SCOPE;
use arc_swap::ArcSwap;
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Key under which the correlation id is stored.
pub const CORRELATION_ID_KEY: &str = "correlationId";

/// Named values belonging to one unit of work.
///
/// Cloning a `Scope` yields another handle to the same values: a `set` made
/// through any handle is seen by all of them. Reads load an immutable snapshot
/// and never lock; writes swap in a new snapshot for this scope only.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

struct ScopeInner {
    values: ArcSwap<Map<String, Value>>,
}

impl Scope {
    /// Create a scope carrying `correlation_id`.
    pub fn new(correlation_id: impl Into<String>) -> Self {
        let mut values = Map::new();
        values.insert(
            CORRELATION_ID_KEY.to_string(),
            Value::String(correlation_id.into()),
        );
        Self::from_values(values)
    }

    /// Create a scope with no values at all.
    pub fn empty() -> Self {
        Self::from_values(Map::new())
    }

    /// Create a scope from an existing set of values.
    pub fn from_values(values: Map<String, Value>) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                values: ArcSwap::from_pointee(values),
            }),
        }
    }

    /// Add a value before the scope is activated.
    pub fn with_value(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// The scope that is active on the calling execution path, if any.
    pub fn current() -> Option<Scope> {
        ACTIVE_SCOPE.try_with(|scope| scope.clone()).ok().flatten()
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.values.load().get(key).cloned()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        self.inner.values.rcu(|current| {
            let mut next = Map::clone(current);
            next.insert(key.clone(), value.clone());
            next
        });
    }

    /// The correlation id, rendered as a string.
    ///
    /// A JSON `null` counts as unset; any other non-string value is rendered
    /// as its JSON text.
    pub fn correlation_id(&self) -> Option<String> {
        match self.get(CORRELATION_ID_KEY)? {
            Value::Null => None,
            Value::String(id) => Some(id),
            other => Some(other.to_string()),
        }
    }

    /// A point-in-time copy of every value in the scope.
    pub fn snapshot(&self) -> Arc<Map<String, Value>> {
        self.inner.values.load_full()
    }

    /// Whether both handles refer to the same unit of work.
    pub fn ptr_eq(&self, other: &Scope) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Run `fut` with this scope active.
    ///
    /// The scope stays active across every suspension point of `fut` and is
    /// replaced by whatever was active before once `fut` completes.
    pub fn run<F: Future>(self, fut: F) -> Scoped<F> {
        ACTIVE_SCOPE.scope(Some(self), fut)
    }

    /// Run the synchronous closure `f` with this scope active.
    pub fn enter<R>(&self, f: impl FnOnce() -> R) -> R {
        ACTIVE_SCOPE.sync_scope(Some(self.clone()), f)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("values", &*self.inner.values.load())
            .finish()
    }
}
