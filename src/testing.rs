//! Test helpers, compiled with the `test-utils` feature.

use std::sync::{Arc, Mutex, PoisonError};

use crate::evaluator::{Evaluator, PermissionObserver, SubscriptionId};
use crate::types::PermissionSet;

/// Observer that records every permission set it is notified with.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    seen: Arc<Mutex<Vec<PermissionSet>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a fresh recorder to `evaluator`.
    pub fn attach(evaluator: &Evaluator) -> (Self, SubscriptionId) {
        let recorder = Self::new();
        let id = evaluator.subscribe(recorder.clone());
        (recorder, id)
    }

    pub fn count(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn seen(&self) -> Vec<PermissionSet> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last(&self) -> Option<PermissionSet> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }
}

impl PermissionObserver for RecordingObserver {
    fn on_change(&self, current: &PermissionSet) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(current.clone());
    }
}

/// Installs a `tracing` subscriber writing to the test output. Safe to call repeatedly.
#[cfg(feature = "tracing-subscriber")]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[cfg(not(feature = "tracing-subscriber"))]
pub fn init_tracing() {}
