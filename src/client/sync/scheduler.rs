//! # Polling Scheduler
//!
//! Recurring fetches for server-owned resources. Each resource key has at most
//! one live polling task; subscribing again for a key replaces the old task.
//!
//! ## Behavior
//!
//! - **Immediate start**: the first fetch runs without waiting for the interval
//! - **Sequential ticks**: a key's next fetch starts only after the previous
//!   one has finished and applied its result; late ticks are delayed, never
//!   bursted
//! - **Failure tolerance**: a failed fetch is logged and the loop keeps going
//! - **Synchronous cancellation**: cancelling returns immediately and can be
//!   repeated safely
//!
//! ## Usage
//!
//! ```rust,no_run
//! use marketsync::client::sync::{PollingLoop, ResourceKey};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let poller = PollingLoop::new();
//! let subscription = poller.subscribe(ResourceKey::conversations(), Duration::from_secs(10), || {
//!     Box::pin(async { Ok(()) })
//! });
//! subscription.cancel();
//! # }
//! ```

use crate::shared::error::SyncResult;
use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::MissedTickBehavior;

/// Future returned by a fetch callback
pub type FetchFuture = BoxFuture<'static, SyncResult<()>>;

/// Identifies a polled resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The conversation list
    pub fn conversations() -> Self {
        Self::new("conversations")
    }

    /// The message list of whichever conversation is active
    pub fn messages() -> Self {
        Self::new("messages")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug)]
struct Entry {
    id: u64,
    handle: AbortHandle,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    entries: HashMap<ResourceKey, Entry>,
}

/// Registry of polling tasks, one per resource key
#[derive(Debug, Clone, Default)]
pub struct PollingLoop {
    registry: Arc<Mutex<Registry>>,
}

impl PollingLoop {
    /// Create an empty polling loop
    pub fn new() -> Self {
        Self::default()
    }

    /// Start polling `key` every `interval`, replacing any existing loop for it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn subscribe<F>(&self, key: ResourceKey, interval: Duration, mut fetch: F) -> Subscription
    where
        F: FnMut() -> FetchFuture + Send + 'static,
    {
        let interval = interval.max(Duration::from_millis(1));
        let mut registry = self.registry.lock();

        if let Some(previous) = registry.entries.remove(&key) {
            previous.handle.abort();
            tracing::debug!("[POLL] Replaced polling loop for {}", key);
        }

        registry.next_id += 1;
        let id = registry.next_id;
        let task_key = key.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if let Err(e) = fetch().await {
                    tracing::warn!("[POLL] Fetch for {} failed, retrying next tick: {}", task_key, e);
                }
            }
        });

        let handle = task.abort_handle();
        registry.entries.insert(
            key.clone(),
            Entry {
                id,
                handle: handle.clone(),
            },
        );
        tracing::debug!("[POLL] Started polling {} every {:?}", key, interval);

        Subscription {
            key,
            id,
            handle,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Cancel the loop for `key`. Returns whether one was running.
    pub fn cancel(&self, key: &ResourceKey) -> bool {
        match self.registry.lock().entries.remove(key) {
            Some(entry) => {
                entry.handle.abort();
                tracing::debug!("[POLL] Cancelled polling {}", key);
                true
            }
            None => false,
        }
    }

    /// Cancel every loop
    pub fn cancel_all(&self) {
        let mut registry = self.registry.lock();
        for (key, entry) in registry.entries.drain() {
            entry.handle.abort();
            tracing::debug!("[POLL] Cancelled polling {}", key);
        }
    }

    pub fn is_active(&self, key: &ResourceKey) -> bool {
        self.registry.lock().entries.contains_key(key)
    }

    /// Keys with a live loop, sorted
    pub fn active_keys(&self) -> Vec<ResourceKey> {
        let mut keys: Vec<_> = self.registry.lock().entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn active_count(&self) -> usize {
        self.registry.lock().entries.len()
    }
}

/// Handle to one polling loop
#[derive(Debug)]
pub struct Subscription {
    key: ResourceKey,
    id: u64,
    handle: AbortHandle,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    /// Stop this loop. Does nothing if it was already stopped or replaced.
    pub fn cancel(&self) {
        self.handle.abort();
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock();
            if registry.entries.get(&self.key).map(|e| e.id) == Some(self.id) {
                registry.entries.remove(&self.key);
            }
        }
    }

    /// Whether this loop is still the registered one for its key
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.lock().entries.get(&self.key).map(|e| e.id) == Some(self.id))
            .unwrap_or(false)
    }
}
