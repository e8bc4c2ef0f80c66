// src/cache/mod.rs — Query cache for platform API responses
//
// Deduplicates and caches server responses keyed by logical resource name
// ("dashboard-summary", "accounts", ...). Guarantees per key:
//
//   - at most one in-flight request, no matter how many views ask at once;
//   - cached values younger than the staleness window are served without a
//     network call;
//   - a retriable failure gets exactly one retry before the error state is
//     surfaced;
//   - a load that was superseded (the key was invalidated and a newer load
//     committed first) is discarded, never overwriting the newer result.
//
// Expired entries still expose their last-known value through `read()` so
// views can render optimistically while a refetch runs.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, watch, Mutex};

use crate::infra::config::CacheConfig;
use crate::infra::errors::PulsedeckError;

/// Lifecycle state of one cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of a cache entry for rendering. `fresh` is false for entries
/// past the staleness window; their `value` is the optimistic last-known one.
#[derive(Debug, Clone)]
pub struct CachedView {
    pub status: FetchStatus,
    pub value: Option<Value>,
    pub error: Option<String>,
    pub fresh: bool,
}

/// Change notification delivered to subscribers of a key.
#[derive(Debug, Clone)]
pub struct CacheEvent {
    pub key: String,
    pub outcome: CacheOutcome,
}

#[derive(Debug, Clone)]
pub enum CacheOutcome {
    Updated,
    Failed(String),
}

/// Terminal state of a load, stored so waiters that shared the in-flight
/// request can reproduce the outcome.
#[derive(Debug, Clone)]
struct StoredError {
    unauthorized: bool,
    message: String,
}

impl StoredError {
    fn from_error(err: &PulsedeckError) -> Self {
        Self {
            unauthorized: matches!(err, PulsedeckError::Unauthorized),
            message: err.to_string(),
        }
    }

    fn to_error(&self, key: &str) -> PulsedeckError {
        if self.unauthorized {
            PulsedeckError::Unauthorized
        } else {
            PulsedeckError::Transport {
                endpoint: key.to_string(),
                message: self.message.clone(),
                retriable: false,
            }
        }
    }
}

struct Slot {
    status: FetchStatus,
    value: Option<Value>,
    error: Option<StoredError>,
    fetched_at: Option<Instant>,
    /// Ticket handed to the next load that starts for this key.
    next_ticket: u64,
    /// Ticket of the load that last committed. Completing loads with an
    /// older ticket are discarded.
    committed_ticket: u64,
    /// Current in-flight load: its ticket plus a completion signal that
    /// waiters share instead of issuing their own network call.
    inflight: Option<(u64, watch::Receiver<bool>)>,
    subscribers: usize,
}

impl Slot {
    fn new() -> Self {
        Self {
            status: FetchStatus::Idle,
            value: None,
            error: None,
            fetched_at: None,
            next_ticket: 1,
            committed_ticket: 0,
            inflight: None,
            subscribers: 0,
        }
    }
}

struct Inner {
    slots: Mutex<HashMap<String, Slot>>,
    stale_after: Duration,
    retry_attempts: u32,
    retry_delay: Duration,
    events: broadcast::Sender<CacheEvent>,
}

#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

/// Live subscription to change events for one key. Dropping it unregisters
/// the subscriber; keys with no live subscribers produce no notifications,
/// so a view that navigated away never sees a stale update.
pub struct Subscription {
    key: String,
    rx: broadcast::Receiver<CacheEvent>,
    inner: Arc<Inner>,
}

impl Subscription {
    /// Wait for the next event concerning this subscription's key.
    pub async fn changed(&mut self) -> Option<CacheEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.key == self.key => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let inner = self.inner.clone();
        let key = self.key.clone();
        // blocking_lock would panic inside a runtime; spawn the decrement.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                let mut slots = inner.slots.lock().await;
                if let Some(slot) = slots.get_mut(&key) {
                    slot.subscribers = slot.subscribers.saturating_sub(1);
                }
            });
        }
    }
}

impl QueryCache {
    pub fn new(config: &CacheConfig) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            inner: Arc::new(Inner {
                slots: Mutex::new(HashMap::new()),
                stale_after: config.stale_after(),
                retry_attempts: config.retry_attempts,
                retry_delay: config.retry_delay(),
                events,
            }),
        }
    }

    /// Fetch a typed resource. Serves the cached value when fresh, joins an
    /// in-flight request when one exists, and otherwise runs `loader`
    /// (retrying once on a retriable failure) and commits the result.
    pub async fn fetch<T, F, Fut>(&self, key: &str, loader: F) -> Result<T, PulsedeckError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, PulsedeckError>>,
    {
        // Fast path / join path / leader election under the lock.
        let (ticket, done_tx) = loop {
            let mut slots = self.inner.slots.lock().await;
            let slot = slots.entry(key.to_string()).or_insert_with(Slot::new);

            if slot.status == FetchStatus::Success {
                if let (Some(value), Some(at)) = (&slot.value, slot.fetched_at) {
                    if at.elapsed() < self.inner.stale_after {
                        tracing::debug!(key, "cache hit");
                        return decode(key, value.clone());
                    }
                }
            }

            if let Some((leader_ticket, rx)) = slot.inflight.clone() {
                // Someone else is loading this key. Wait for them instead of
                // issuing a duplicate network call.
                drop(slots);
                let mut rx = rx;
                if rx.wait_for(|done| *done).await.is_err() {
                    // Leader task went away without completing. Detach its
                    // marker so the next lap can elect a new leader.
                    let mut slots = self.inner.slots.lock().await;
                    if let Some(slot) = slots.get_mut(key) {
                        if slot.inflight.as_ref().map(|(t, _)| *t) == Some(leader_ticket) {
                            slot.inflight = None;
                        }
                    }
                    continue;
                }

                let slots = self.inner.slots.lock().await;
                if let Some(slot) = slots.get(key) {
                    match slot.status {
                        FetchStatus::Success => {
                            if let Some(value) = &slot.value {
                                return decode(key, value.clone());
                            }
                        }
                        FetchStatus::Error => {
                            if let Some(err) = &slot.error {
                                return Err(err.to_error(key));
                            }
                        }
                        _ => {}
                    }
                }
                // The load we waited on was superseded; take another lap.
                continue;
            }

            // We are the leader for this load.
            let ticket = slot.next_ticket;
            slot.next_ticket += 1;
            slot.status = FetchStatus::Loading;
            let (tx, rx) = watch::channel(false);
            slot.inflight = Some((ticket, rx));
            break (ticket, tx);
        };

        tracing::debug!(key, ticket, "cache miss, loading");
        let result = self.load_with_retry(key, &loader).await;
        self.commit(key, ticket, result, done_tx).await
    }

    /// Run the loader, retrying once (configurable) on retriable failures.
    async fn load_with_retry<T, F, Fut>(&self, key: &str, loader: &F) -> Result<T, PulsedeckError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, PulsedeckError>>,
    {
        let mut attempt = 0;
        loop {
            match loader().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retriable() && attempt < self.inner.retry_attempts => {
                    attempt += 1;
                    tracing::warn!(key, attempt, "retrying after transport failure: {e}");
                    tokio::time::sleep(self.inner.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Commit a completed load unless a newer load already committed for
    /// this key, in which case the stale result is discarded and the newer
    /// committed state is returned instead.
    async fn commit<T>(
        &self,
        key: &str,
        ticket: u64,
        result: Result<T, PulsedeckError>,
        done_tx: watch::Sender<bool>,
    ) -> Result<T, PulsedeckError>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut slots = self.inner.slots.lock().await;
        let slot = slots.entry(key.to_string()).or_insert_with(Slot::new);

        if ticket <= slot.committed_ticket {
            tracing::debug!(key, ticket, "discarding superseded response");
            let _ = done_tx.send(true);
            return match (slot.status, &slot.value, &slot.error) {
                (FetchStatus::Success, Some(value), _) => decode(key, value.clone()),
                (FetchStatus::Error, _, Some(err)) => Err(err.to_error(key)),
                _ => result,
            };
        }

        slot.committed_ticket = ticket;
        // Only clear the in-flight marker if it is still ours; an
        // invalidate() may have detached it and a newer leader taken over.
        if slot.inflight.as_ref().map(|(t, _)| *t) == Some(ticket) {
            slot.inflight = None;
        }

        let notify = slot.subscribers > 0;
        let outcome = match result {
            Ok(value) => {
                let json = serde_json::to_value(&value).map_err(|e| {
                    PulsedeckError::Other(anyhow::anyhow!("unencodable cache value: {e}"))
                })?;
                slot.status = FetchStatus::Success;
                slot.value = Some(json);
                slot.error = None;
                slot.fetched_at = Some(Instant::now());
                let _ = done_tx.send(true);
                if notify {
                    let _ = self.inner.events.send(CacheEvent {
                        key: key.to_string(),
                        outcome: CacheOutcome::Updated,
                    });
                }
                Ok(value)
            }
            Err(e) => {
                // Keep the last-known value for optimistic display.
                slot.status = FetchStatus::Error;
                slot.error = Some(StoredError::from_error(&e));
                let _ = done_tx.send(true);
                if notify {
                    let _ = self.inner.events.send(CacheEvent {
                        key: key.to_string(),
                        outcome: CacheOutcome::Failed(e.to_string()),
                    });
                }
                Err(e)
            }
        };
        outcome
    }

    /// Force the next fetch for `key` to reload. A load already in flight
    /// is detached: it keeps running, but a newer load can start and commit,
    /// after which the detached result is discarded.
    pub async fn invalidate(&self, key: &str) {
        let mut slots = self.inner.slots.lock().await;
        if let Some(slot) = slots.get_mut(key) {
            slot.fetched_at = None;
            slot.inflight = None;
        }
    }

    /// Snapshot the entry for rendering without triggering a load.
    pub async fn read(&self, key: &str) -> Option<CachedView> {
        let slots = self.inner.slots.lock().await;
        slots.get(key).map(|slot| CachedView {
            status: slot.status,
            value: slot.value.clone(),
            error: slot.error.as_ref().map(|e| e.message.clone()),
            fresh: slot
                .fetched_at
                .map(|at| at.elapsed() < self.inner.stale_after)
                .unwrap_or(false),
        })
    }

    /// Register interest in change events for `key`.
    pub async fn subscribe(&self, key: &str) -> Subscription {
        let mut slots = self.inner.slots.lock().await;
        let slot = slots.entry(key.to_string()).or_insert_with(Slot::new);
        slot.subscribers += 1;
        Subscription {
            key: key.to_string(),
            rx: self.inner.events.subscribe(),
            inner: self.inner.clone(),
        }
    }
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> Result<T, PulsedeckError> {
    serde_json::from_value(value).map_err(|e| {
        PulsedeckError::Other(anyhow::anyhow!("cached value for '{key}' undecodable: {e}"))
    })
}
