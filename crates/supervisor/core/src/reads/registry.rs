use super::{ReadHandle, ReadsError, handle::Marks};
use auto_impl::auto_impl;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError, Weak},
};
use tracing::{debug, trace};

/// A rule describing which reads are affected by a rewind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationRule {
    /// Invalidates reads of derived data at or after the given timestamp.
    DerivedTime(u64),
    /// Invalidates reads of source data at or after the given block number.
    SourceBlock(u64),
}

/// Issues [`ReadHandle`]s.
#[auto_impl(&, Arc)]
pub trait ReadAcquirer {
    /// Acquires a new handle. The handle is released when dropped.
    fn acquire_handle(&self) -> ReadHandle;
}

/// Invalidates outstanding reads ahead of a rewind.
#[auto_impl(&, Arc)]
pub trait Invalidator {
    /// Applies the rules to all active handles, and to every handle acquired until the returned
    /// guard is released.
    ///
    /// The guard must be held for as long as the rewind is in progress.
    ///
    /// # Returns
    /// * `Ok(InvalidationGuard)` if the invalidation started.
    /// * `Err(ReadsError::AlreadyInvalidating)` if another invalidation is in progress.
    fn try_invalidate(&self, rules: &[InvalidationRule])
    -> Result<InvalidationGuard, ReadsError>;
}

#[derive(Debug, Default)]
pub(crate) struct RegistryState {
    next_id: u64,
    handles: HashMap<u64, Arc<Mutex<Marks>>>,
    invalidating: Option<Vec<InvalidationRule>>,
}

impl RegistryState {
    pub(crate) fn remove(&mut self, id: u64) {
        self.handles.remove(&id);
    }
}

/// Keeps track of the active [`ReadHandle`]s and taints them when the data they depend on is
/// rewound.
///
/// Only the bookkeeping of handles is serialized. Reads and rewinds of unrelated data never wait
/// on each other.
#[derive(Debug, Clone, Default)]
pub struct ReadRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl ReadRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of handles that are acquired and not released.
    pub fn active_handles(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).handles.len()
    }

    /// Returns `true` if an invalidation is in progress.
    pub fn is_invalidating(&self) -> bool {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).invalidating.is_some()
    }
}

impl ReadAcquirer for ReadRegistry {
    fn acquire_handle(&self) -> ReadHandle {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.next_id += 1;
        let id = state.next_id;

        let mut marks = Marks::default();
        if let Some(rules) = &state.invalidating {
            // taint handles acquired while a rewind is in progress
            for rule in rules {
                marks.apply(*rule);
            }
            trace!(target: "supervisor::reads", id, "Acquired handle during invalidation");
        }

        let marks = Arc::new(Mutex::new(marks));
        state.handles.insert(id, marks.clone());
        ReadHandle::new(id, marks, Arc::downgrade(&self.state))
    }
}

impl Invalidator for ReadRegistry {
    fn try_invalidate(
        &self,
        rules: &[InvalidationRule],
    ) -> Result<InvalidationGuard, ReadsError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.invalidating.is_some() {
            return Err(ReadsError::AlreadyInvalidating);
        }

        for marks in state.handles.values() {
            let mut marks = marks.lock().unwrap_or_else(PoisonError::into_inner);
            for rule in rules {
                marks.apply(*rule);
            }
        }
        debug!(
            target: "supervisor::reads",
            ?rules,
            active_handles = state.handles.len(),
            "Invalidating reads"
        );

        state.invalidating = Some(rules.to_vec());
        Ok(InvalidationGuard { state: Some(Arc::downgrade(&self.state)) })
    }
}

/// Marks an invalidation as in progress until released or dropped.
#[derive(Debug)]
#[must_use = "the invalidation ends when the guard is dropped"]
pub struct InvalidationGuard {
    state: Option<Weak<Mutex<RegistryState>>>,
}

impl InvalidationGuard {
    /// Ends the invalidation. Calling it more than once has no effect.
    pub fn release(&mut self) {
        let Some(state) = self.state.take().and_then(|state| state.upgrade()) else {
            return;
        };
        state.lock().unwrap_or_else(PoisonError::into_inner).invalidating = None;
        debug!(target: "supervisor::reads", "Finished invalidating reads");
    }
}

impl Drop for InvalidationGuard {
    fn drop(&mut self) {
        self.release();
    }
}
