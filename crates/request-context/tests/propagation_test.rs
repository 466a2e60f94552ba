//! Integration tests for scope propagation across async boundaries

use futures::future::join_all;
use request_context::{
    CORRELATION_ID_KEY, Scope, ScopeExt, correlation_id, get, run_in_scope, set, spawn,
};
use serde_json::json;
use std::time::Duration;
use tokio::sync::{Barrier, oneshot};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_units_of_work_are_isolated() {
    let units = (0..64).map(|i| {
        tokio::spawn(async move {
            let id = format!("unit-{}", i);
            run_in_scope(id.clone(), async move {
                let mut seen = Vec::new();
                for step in 0..10 {
                    if step % 3 == 0 {
                        tokio::time::sleep(Duration::from_millis(1)).await;
                    } else {
                        tokio::task::yield_now().await;
                    }
                    seen.push(correlation_id());
                }
                (id, seen)
            })
            .await
        })
    });

    for result in join_all(units).await {
        let (id, seen) = result.expect("unit of work panicked");
        assert!(
            seen.iter().all(|s| s.as_deref() == Some(id.as_str())),
            "unit {} observed foreign ids: {:?}",
            id,
            seen
        );
    }
}

#[tokio::test(flavor = "current_thread")]
async fn test_interleaved_units_on_one_thread_are_isolated() {
    // Both units are parked at the barrier at the same time, so their code
    // interleaves on the single runtime thread.
    let barrier = std::sync::Arc::new(Barrier::new(2));

    let a = {
        let barrier = barrier.clone();
        run_in_scope("a", async move {
            let before = correlation_id();
            barrier.wait().await;
            (before, correlation_id())
        })
    };
    let b = {
        let barrier = barrier.clone();
        run_in_scope("b", async move {
            let before = correlation_id();
            barrier.wait().await;
            (before, correlation_id())
        })
    };

    let (a, b) = tokio::join!(a, b);
    assert_eq!(a, (Some("a".into()), Some("a".into())));
    assert_eq!(b, (Some("b".into()), Some("b".into())));
}

#[tokio::test]
async fn test_scope_survives_suspension() {
    run_in_scope("sleepy", async {
        assert_eq!(correlation_id().as_deref(), Some("sleepy"));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(correlation_id().as_deref(), Some("sleepy"));

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let _ = tx.send(());
        });
        rx.await.unwrap();
        assert_eq!(correlation_id().as_deref(), Some("sleepy"));
    })
    .await;
}

#[tokio::test]
async fn test_nested_scopes_follow_stack_discipline() {
    run_in_scope("outer", async {
        let inner = run_in_scope("inner", async {
            tokio::task::yield_now().await;
            correlation_id()
        })
        .await;

        assert_eq!(inner.as_deref(), Some("inner"));
        assert_eq!(correlation_id().as_deref(), Some("outer"));
    })
    .await;

    assert!(correlation_id().is_none());
}

#[tokio::test]
async fn test_set_is_visible_to_already_spawned_children() {
    run_in_scope("parent", async {
        let (go_tx, go_rx) = oneshot::channel::<()>();
        let child = spawn(async move {
            go_rx.await.unwrap();
            get("stage")
        });

        set("stage", "after-spawn").unwrap();
        go_tx.send(()).unwrap();

        assert_eq!(child.await.unwrap(), Some(json!("after-spawn")));
    })
    .await;
}

#[tokio::test]
async fn test_fire_and_forget_child_outlives_parent() {
    let (done_tx, done_rx) = oneshot::channel();

    run_in_scope("detached", async move {
        spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let _ = done_tx.send(correlation_id());
        });
    })
    .await;

    assert!(correlation_id().is_none());
    assert_eq!(done_rx.await.unwrap().as_deref(), Some("detached"));
}

#[tokio::test]
async fn test_departed_scope_is_never_observed_again() {
    run_in_scope("first", async {
        set("secret", "first-only").unwrap();
    })
    .await;

    let seen = run_in_scope("second", async { (correlation_id(), get("secret")) }).await;
    assert_eq!(seen, (Some("second".into()), None));

    let unscoped = tokio::spawn(async { get(CORRELATION_ID_KEY) }).await.unwrap();
    assert!(unscoped.is_none());
}

#[tokio::test]
async fn test_cancelled_unit_of_work_does_not_leak() {
    let handle = tokio::spawn(run_in_scope("cancelled", async {
        tokio::time::sleep(Duration::from_secs(60)).await;
    }));
    tokio::task::yield_now().await;
    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());

    let seen = run_in_scope("next", async { correlation_id() }).await;
    assert_eq!(seen.as_deref(), Some("next"));
}

#[tokio::test]
async fn test_extra_values_supplied_at_creation() {
    let scope = Scope::new("with-extras").with_value("tenant", "acme");

    let seen = async { (correlation_id(), get("tenant")) }
        .in_scope(scope)
        .await;

    assert_eq!(seen.0.as_deref(), Some("with-extras"));
    assert_eq!(seen.1, Some(json!("acme")));
}
