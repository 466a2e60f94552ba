//! Carrying the active scope into spawned work.

use crate::scope::Scope;
use crate::store::ACTIVE_SCOPE;
use std::future::Future;
use tokio::task::JoinHandle;
use tokio::task::futures::TaskLocalFuture;

/// A future bound to a scope (or explicitly bound to none).
pub type Scoped<F> = TaskLocalFuture<Option<Scope>, F>;

/// Binding futures to scopes.
pub trait ScopeExt: Future + Sized {
    /// Bind this future to `scope`.
    fn in_scope(self, scope: Scope) -> Scoped<Self> {
        scope.run(self)
    }

    /// Bind this future to the scope active right now.
    ///
    /// Must be called where the scope is active, i.e. before handing the
    /// future to an executor.
    fn in_current_scope(self) -> Scoped<Self> {
        ACTIVE_SCOPE.scope(Scope::current(), self)
    }
}

impl<F: Future> ScopeExt for F {}

/// Spawn a task that stays part of the current unit of work.
///
/// The task shares the caller's scope and keeps it alive for as long as it
/// runs, even after the spawning unit of work has returned.
pub fn spawn<F>(fut: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::spawn(fut.in_current_scope())
}

/// Run blocking code on tokio's blocking pool within the current scope.
pub fn spawn_blocking<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let scope = Scope::current();
    tokio::task::spawn_blocking(move || ACTIVE_SCOPE.sync_scope(scope, f))
}

/// Start an OS thread within the current scope.
pub fn spawn_thread<F, R>(f: F) -> std::thread::JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let scope = Scope::current();
    std::thread::spawn(move || ACTIVE_SCOPE.sync_scope(scope, f))
}
