//! Change listeners.
//!
//! Listeners are called synchronously, in subscription order, every time a
//! selection is applied. The list is snapshotted before notification, so a
//! listener may unsubscribe itself (or others) while being called; the
//! change takes effect on the next notification.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::selection::ActiveSelection;

/// A selection change listener.
pub type Listener = Arc<dyn Fn(&ActiveSelection) + Send + Sync>;

#[derive(Default)]
struct Entries {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

#[derive(Clone, Default)]
pub(crate) struct ListenerList {
    entries: Arc<Mutex<Entries>>,
}

impl ListenerList {
    pub(crate) fn add(&self, listener: Listener) -> Subscription {
        let mut entries = lock(&self.entries);
        let id = entries.next_id;
        entries.next_id += 1;
        entries.listeners.push((id, listener));
        Subscription {
            id,
            entries: Arc::downgrade(&self.entries),
        }
    }

    pub(crate) fn notify(&self, active: &ActiveSelection) {
        let snapshot: Vec<Listener> = lock(&self.entries)
            .listeners
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in snapshot {
            listener(active);
        }
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.entries).listeners.len()
    }
}

impl std::fmt::Debug for ListenerList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerList")
            .field("len", &self.len())
            .finish()
    }
}

fn lock(entries: &Mutex<Entries>) -> MutexGuard<'_, Entries> {
    entries.lock().unwrap_or_else(|e| e.into_inner())
}

/// Handle returned by [`ThemeEngine::subscribe`](crate::ThemeEngine::subscribe).
///
/// Dropping the handle keeps the listener registered; call
/// [`unsubscribe`](Subscription::unsubscribe) to remove it.
#[derive(Debug)]
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription {
    id: u64,
    entries: Weak<Mutex<Entries>>,
}

impl Subscription {
    /// Removes the listener. A no-op once the engine is gone.
    pub fn unsubscribe(self) {
        if let Some(entries) = self.entries.upgrade() {
            lock(&entries).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
