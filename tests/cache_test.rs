// tests/cache_test.rs — Query cache behavior through the public API

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::sync::Notify;

use pulsedeck::cache::{CacheOutcome, FetchStatus, QueryCache};
use pulsedeck::infra::config::CacheConfig;
use pulsedeck::infra::errors::PulsedeckError;

fn cache() -> QueryCache {
    QueryCache::new(&CacheConfig {
        stale_after_seconds: 300,
        retry_attempts: 1,
        retry_delay_ms: 1,
    })
}

#[tokio::test]
async fn test_fresh_value_served_without_loader_call() {
    let cache = cache();
    let calls = Arc::new(AtomicU32::new(0));

    for _ in 0..3 {
        let calls = calls.clone();
        let got: u32 = cache
            .fetch("accounts", move || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(41u32) }
            })
            .await
            .unwrap();
        assert_eq!(got, 41);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_fetches_share_one_request() {
    let cache = cache();
    let calls = Arc::new(AtomicU32::new(0));
    let gate = Arc::new(Notify::new());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = cache.clone();
        let calls = calls.clone();
        let gate = gate.clone();
        handles.push(tokio::spawn(async move {
            cache
                .fetch("summary", move || {
                    let calls = calls.clone();
                    let gate = gate.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        gate.notified().await;
                        Ok(7u32)
                    }
                })
                .await
        }));
    }

    // Let all tasks reach the cache before the load resolves.
    tokio::time::sleep(Duration::from_millis(50)).await;
    gate.notify_waiters();

    for handle in handles {
        let got: u32 = handle.await.unwrap().unwrap();
        assert_eq!(got, 7);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retriable_failure_retried_once() {
    let cache = cache();
    let calls = Arc::new(AtomicU32::new(0));

    let calls2 = calls.clone();
    let got: u32 = cache
        .fetch("flaky", move || {
            let n = calls2.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(PulsedeckError::Transport {
                        endpoint: "flaky".into(),
                        message: "timed out".into(),
                        retriable: true,
                    })
                } else {
                    Ok(9u32)
                }
            }
        })
        .await
        .unwrap();

    assert_eq!(got, 9);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_error_preserves_last_known_value() {
    let cache = cache();

    let _: u32 = cache.fetch("niches", || async { Ok(5u32) }).await.unwrap();
    cache.invalidate("niches").await;

    let err = cache
        .fetch::<u32, _, _>("niches", || async {
            Err(PulsedeckError::Validation("broken".into()))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PulsedeckError::Validation(_)));

    // The stale value stays readable for optimistic rendering.
    let view = cache.read("niches").await.unwrap();
    assert_eq!(view.status, FetchStatus::Error);
    assert_eq!(view.value, Some(serde_json::json!(5)));
}

#[tokio::test]
async fn test_unauthorized_surfaces_to_all_waiters() {
    let cache = cache();
    let gate = Arc::new(Notify::new());

    let mut handles = Vec::new();
    for _ in 0..3 {
        let cache = cache.clone();
        let gate = gate.clone();
        handles.push(tokio::spawn(async move {
            cache
                .fetch::<u32, _, _>("me", move || {
                    let gate = gate.clone();
                    async move {
                        gate.notified().await;
                        Err(PulsedeckError::Unauthorized)
                    }
                })
                .await
        }));
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    gate.notify_waiters();

    // Waiters that joined the shared request still see Unauthorized, so
    // every view can route to login.
    for handle in handles {
        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, PulsedeckError::Unauthorized));
    }
}

#[tokio::test]
async fn test_subscriber_sees_update_events() {
    let cache = cache();
    let mut sub = cache.subscribe("content").await;

    let cache2 = cache.clone();
    let handle = tokio::spawn(async move {
        let event = sub.changed().await.unwrap();
        assert_eq!(event.key, "content");
        assert!(matches!(event.outcome, CacheOutcome::Updated));
    });

    let _: u32 = cache2.fetch("content", || async { Ok(1u32) }).await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let cache = cache();
    let calls = Arc::new(AtomicU32::new(0));

    for _ in 0..2 {
        let calls = calls.clone();
        let _: u32 = cache
            .fetch("funnel", move || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(3u32) }
            })
            .await
            .unwrap();
        cache.invalidate("funnel").await;
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
