//! Observer registry for permission-set changes.
//!
//! Every registered observer receives every change; there is no per-observer
//! filtering. The registry is owned by the `Evaluator`, there is no ambient bus.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, ThreadId};

use crate::types::PermissionSet;

/// Something that wants to hear about permission-set changes.
///
/// Called synchronously from `Evaluator::change`, after the new set has been
/// stored, so `get`/`check` from inside `on_change` already see it.
pub trait PermissionObserver: Send + Sync + 'static {
    fn on_change(&self, current: &PermissionSet);
}

impl<F> PermissionObserver for F
where
    F: Fn(&PermissionSet) + Send + Sync + 'static,
{
    fn on_change(&self, current: &PermissionSet) {
        self(current)
    }
}

/// Handle returned by `Evaluator::subscribe`, used to unsubscribe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(uuid::Uuid);

impl SubscriptionId {
    fn new() -> Self {
        SubscriptionId(uuid::Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

type Entry = (SubscriptionId, Arc<dyn PermissionObserver>);

#[derive(Default)]
pub(crate) struct Subscribers {
    entries: RwLock<Vec<Entry>>,
}

impl Subscribers {
    pub(crate) fn add(&self, observer: Arc<dyn PermissionObserver>) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, observer));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Copy of the current observers, in registration order.
    /// Notification iterates this copy so observers may (un)subscribe re-entrantly.
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn PermissionObserver>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers").field("len", &self.len()).finish()
    }
}

#[derive(Debug, Default)]
struct DispatchState {
    /// Thread currently delivering notifications.
    owner: Option<ThreadId>,
    /// A change was stored while the owner was delivering.
    dirty: bool,
}

/// Serializes notification rounds so observers always end on the latest set.
///
/// One thread at a time owns dispatch. A `change` made by the owner from inside
/// an observer only marks the round dirty; the owner then restarts delivery with
/// the newest set. Other threads wait for the owner to finish and then deliver.
#[derive(Debug, Default)]
pub(crate) struct Dispatch {
    state: Mutex<DispatchState>,
    idle: Condvar,
}

impl Dispatch {
    fn lock(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes ownership of dispatch, or returns `None` when this thread already
    /// owns it (a re-entrant change from an observer).
    pub(crate) fn enter(&self) -> Option<DispatchTurn<'_>> {
        let me = thread::current().id();
        let mut state = self.lock();
        loop {
            match state.owner {
                None => {
                    state.owner = Some(me);
                    state.dirty = false;
                    return Some(DispatchTurn { dispatch: self });
                }
                Some(owner) if owner == me => {
                    state.dirty = true;
                    return None;
                }
                Some(_) => {
                    state = self.idle.wait(state).unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }
}

/// Ownership of dispatch; released on drop, also when an observer panics.
pub(crate) struct DispatchTurn<'a> {
    dispatch: &'a Dispatch,
}

impl DispatchTurn<'_> {
    pub(crate) fn is_dirty(&self) -> bool {
        self.dispatch.lock().dirty
    }

    /// Clears the dirty mark, returning whether it was set.
    pub(crate) fn take_dirty(&self) -> bool {
        std::mem::replace(&mut self.dispatch.lock().dirty, false)
    }
}

impl Drop for DispatchTurn<'_> {
    fn drop(&mut self) {
        let mut state = self.dispatch.lock();
        state.owner = None;
        state.dirty = false;
        drop(state);
        self.dispatch.idle.notify_all();
    }
}
