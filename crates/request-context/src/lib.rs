//! Request-scoped context propagation.
//!
//! A [`Scope`] holds the named values of one unit of work (one inbound
//! request, one job). Once a future runs inside a scope, every line of code it
//! reaches, across any number of `.await` points, sees that scope through
//! [`get`] without the values being passed down explicitly.
//!
//! # Propagation
//!
//! Scopes live in tokio task-local storage. The active scope travels with the
//! future, not with the worker thread that happens to poll it, so two requests
//! interleaved on one worker (or running in parallel on different workers)
//! never observe each other's values.
//!
//! Task-locals are not inherited by `tokio::spawn`. Work that is logically
//! part of the current unit of work must be started with [`spawn`],
//! [`spawn_blocking`], [`spawn_thread`] or wrapped with
//! [`ScopeExt::in_current_scope`]. A bare `tokio::spawn` starts unscoped.
//!
//! # Example
//!
//! ```no_run
//! use request_context::{run_in_scope, correlation_id, spawn};
//!
//! # async fn example() {
//! run_in_scope("req-42", async {
//!     assert_eq!(correlation_id().as_deref(), Some("req-42"));
//!
//!     spawn(async {
//!         // Still part of req-42.
//!         assert_eq!(correlation_id().as_deref(), Some("req-42"));
//!     })
//!     .await
//!     .unwrap();
//! })
//! .await;
//!
//! assert!(correlation_id().is_none());
//! # }
//! ```

pub mod correlation;
pub mod scope;
pub mod spawn;
pub mod store;

pub use correlation::{new_correlation_id, resolve_correlation_id, sanitize_correlation_id};
pub use scope::{CORRELATION_ID_KEY, Scope};
pub use spawn::{ScopeExt, Scoped, spawn, spawn_blocking, spawn_thread};
pub use store::{correlation_id, current, get, is_active, run_in_scope, run_in_scope_sync, set};
