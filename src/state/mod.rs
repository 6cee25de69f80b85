// State management module
//
// This module provides the StateManager which wraps BatchState with thread-safe access
// using Arc<RwLock<T>>. The orchestrator is its only writer.

use crate::events::Event;
use crate::models::{BatchState, RunState};
use std::sync::{Arc, PoisonError, RwLock};

/// Thread-safe holder of the current [`BatchState`]
///
/// - [`try_begin()`](Self::try_begin) atomically moves `Idle → Running`; a second caller loses
/// - [`apply()`](Self::apply) folds a drained event in; `Done` moves back to `Idle`
/// - [`read()`](Self::read) / [`snapshot()`](Self::snapshot) for consumers
///
/// Lock poisoning is recovered rather than propagated: the state is plain data and every
/// update leaves it consistent.
#[derive(Debug, Default, Clone)]
pub struct StateManager {
    state: Arc<RwLock<BatchState>>,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a read-only copy of the current state
    pub fn snapshot(&self) -> BatchState {
        self.read(|state| state.clone())
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let progress = state_manager.read(|state| state.progress);
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&BatchState) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Mutate the state under the write lock
    pub fn update<F, R>(&self, update_fn: F) -> R
    where
        F: FnOnce(&mut BatchState) -> R,
    {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        update_fn(&mut state)
    }

    pub fn run_state(&self) -> RunState {
        self.read(|state| state.run_state)
    }

    /// Claim the worker for a new batch.
    ///
    /// Returns `false` (and changes nothing) if a batch is already running.
    pub fn try_begin(&self) -> bool {
        self.update(|state| {
            if state.is_running() {
                false
            } else {
                state.begin();
                true
            }
        })
    }

    /// Fold a drained event into the state
    pub fn apply(&self, event: &Event) {
        self.update(|state| {
            let was_running = state.is_running();
            state.apply(event);

            if was_running && !state.is_running() {
                tracing::info!(
                    "Batch finished: {}/{} files attempted, {} errors",
                    state.progress,
                    state.total_files,
                    state.error_count
                );
            }
        });
    }
}
