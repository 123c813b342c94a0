// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Registry of brightness-change listeners.
//
// Listeners are invoked outside the registry lock so a callback may add or
// remove listeners (including itself) without deadlocking.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{BrightnessError, Result};
use crate::types::ListenerId;

/// Callback receiving the new normalised brightness.
pub type BrightnessListener = Arc<dyn Fn(f64) + Send + Sync>;

#[derive(Default)]
struct Inner {
    next_id: u32,
    /// Registration order is notification order.
    entries: Vec<(ListenerId, BrightnessListener)>,
}

/// Thread-safe, id-addressed set of listeners.
#[derive(Default)]
pub struct ListenerRegistry {
    inner: Mutex<Inner>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking listener never runs under this lock, so poisoning can
        // only come from a bug in this module; the data is still consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a listener. Ids start at 1 and are never reused; once the
    /// id space is spent, registration fails with `ListenerIdsExhausted`.
    pub fn add(&self, listener: BrightnessListener) -> Result<ListenerId> {
        let mut inner = self.lock();
        let next = inner
            .next_id
            .checked_add(1)
            .ok_or(BrightnessError::ListenerIdsExhausted)?;
        inner.next_id = next;
        let id = ListenerId(next);
        inner.entries.push((id, listener));
        tracing::debug!(%id, "brightness listener added");
        Ok(id)
    }

    /// Remove a listener. Returns `false` if the id was unknown.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|(entry_id, _)| *entry_id != id);
        let removed = inner.entries.len() != before;
        if removed {
            tracing::debug!(%id, "brightness listener removed");
        }
        removed
    }

    /// Invoke every listener with `value`.
    pub fn notify(&self, value: f64) {
        let snapshot: Vec<(ListenerId, BrightnessListener)> = self.lock().entries.clone();

        for (id, listener) in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(value))).is_err() {
                tracing::error!(%id, value, "error notifying brightness listener");
            }
        }
    }

    /// Drop every registered listener. Id allocation continues where it left off.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder() -> (Arc<Mutex<Vec<f64>>>, BrightnessListener) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener: BrightnessListener = Arc::new(move |v: f64| sink.lock().expect("lock").push(v));
        (seen, listener)
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let registry = ListenerRegistry::new();
        let a = registry.add(Arc::new(|_: f64| {})).expect("add");
        let b = registry.add(Arc::new(|_: f64| {})).expect("add");
        assert_eq!(a, ListenerId(1));
        assert_eq!(b, ListenerId(2));
    }

    #[test]
    fn notify_reaches_every_listener() {
        let registry = ListenerRegistry::new();
        let (first, l1) = recorder();
        let (second, l2) = recorder();
        registry.add(l1).expect("add");
        registry.add(l2).expect("add");

        registry.notify(0.25);

        assert_eq!(*first.lock().expect("lock"), vec![0.25]);
        assert_eq!(*second.lock().expect("lock"), vec![0.25]);
    }

    #[test]
    fn removed_listener_is_not_notified() {
        let registry = ListenerRegistry::new();
        let (seen, listener) = recorder();
        let id = registry.add(listener).expect("add");

        assert!(registry.remove(id));
        registry.notify(0.9);

        assert!(seen.lock().expect("lock").is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn removing_unknown_id_is_a_noop() {
        let registry = ListenerRegistry::new();
        registry.add(Arc::new(|_: f64| {})).expect("add");
        assert!(!registry.remove(ListenerId(42)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn panicking_listener_does_not_stop_others() {
        let registry = ListenerRegistry::new();
        fn failing(_: f64) {
            panic!("listener failure");
        }

        registry.add(Arc::new(failing)).expect("add");
        let (seen, listener) = recorder();
        registry.add(listener).expect("add");

        registry.notify(0.5);

        assert_eq!(*seen.lock().expect("lock"), vec![0.5]);
    }

    #[test]
    fn listener_may_unregister_itself() {
        let registry = Arc::new(ListenerRegistry::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let reg = Arc::clone(&registry);
        let counter = Arc::clone(&calls);
        let id_cell = Arc::new(Mutex::new(None::<ListenerId>));
        let id_slot = Arc::clone(&id_cell);
        let id = registry
            .add(Arc::new(move |_: f64| {
                counter.fetch_add(1, Ordering::SeqCst);
                if let Some(id) = *id_slot.lock().expect("lock") {
                    reg.remove(id);
                }
            }))
            .expect("add");
        *id_cell.lock().expect("lock") = Some(id);

        registry.notify(0.1);
        registry.notify(0.2);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_keeps_id_sequence() {
        let registry = ListenerRegistry::new();
        registry.add(Arc::new(|_: f64| {})).expect("add");
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.add(Arc::new(|_: f64| {})).expect("add"), ListenerId(2));
    }

    #[test]
    fn exhausted_id_space_is_an_error() {
        let registry = ListenerRegistry::new();
        registry.lock().next_id = u32::MAX - 1;

        assert_eq!(registry.add(Arc::new(|_: f64| {})).expect("last id"), ListenerId(u32::MAX));
        let err = registry.add(Arc::new(|_: f64| {})).expect_err("no ids left");
        assert!(matches!(err, BrightnessError::ListenerIdsExhausted));
        assert_eq!(registry.len(), 1);
    }
}
