//! SingleFlight Module
//!
//! Suppresses duplicate concurrent loads of the same key.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::error::{CacheError, Result};

/// Result slot of one in-flight call, `None` until the leader finishes.
type Slot<T> = Option<Result<T>>;

enum Role<T> {
    Leader(watch::Sender<Slot<T>>),
    Waiter(watch::Receiver<Slot<T>>),
}

// == Flight ==
/// Coalesces concurrent calls per key.
///
/// The first caller for a key becomes the leader and runs the work; callers
/// arriving while it runs wait for the leader's result instead of running
/// the work themselves. Results are not kept once the call completes.
pub struct Flight<T> {
    /// In-flight calls by key
    calls: Mutex<HashMap<String, watch::Receiver<Slot<T>>>>,
}

impl<T: Clone> Flight<T> {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    // == Work ==
    /// Runs `f` for `key` unless a call for `key` is already in flight, in
    /// which case its result is shared.
    ///
    /// `f` runs without the registry lock held, so other keys proceed
    /// concurrently. If the leader is dropped before finishing, waiters get
    /// [`CacheError::Internal`].
    pub async fn work<F, Fut>(&self, key: &str, f: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let role = {
            let mut calls = self.calls.lock();
            match calls.get(key) {
                Some(rx) => Role::Waiter(rx.clone()),
                None => {
                    let (tx, rx) = watch::channel(None);
                    calls.insert(key.to_owned(), rx);
                    Role::Leader(tx)
                }
            }
        };

        match role {
            Role::Waiter(rx) => Self::wait(rx).await,
            Role::Leader(tx) => {
                let registration = Registration { flight: self, key };
                let result = f().await;
                tx.send_replace(Some(result.clone()));
                drop(registration);
                result
            }
        }
    }

    async fn wait(mut rx: watch::Receiver<Slot<T>>) -> Result<T> {
        match rx.wait_for(Option::is_some).await {
            Ok(slot) => (*slot)
                .clone()
                .unwrap_or_else(|| Err(CacheError::Internal("empty in-flight result".to_string()))),
            Err(_) => Err(CacheError::Internal(
                "in-flight load was abandoned".to_string(),
            )),
        }
    }

    /// Whether a call for `key` is currently running.
    pub fn is_in_flight(&self, key: &str) -> bool {
        self.calls.lock().contains_key(key)
    }
}

impl<T: Clone> Default for Flight<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Flight<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flight")
            .field("in_flight", &self.calls.lock().len())
            .finish()
    }
}

/// Unregisters the leader's call when it completes or is dropped.
struct Registration<'a, T> {
    flight: &'a Flight<T>,
    key: &'a str,
}

impl<T> Drop for Registration<'_, T> {
    fn drop(&mut self) {
        self.flight.calls.lock().remove(self.key);
    }
}
