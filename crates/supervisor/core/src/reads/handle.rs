use super::{InvalidationRule, ReadsError, registry::RegistryState};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Dependency and invalidation marks of a single [`ReadHandle`].
///
/// Dependency marks only ever grow and invalidation marks only ever shrink, so once a handle
/// turns invalid it never becomes valid again.
#[derive(Debug, Default)]
pub(crate) struct Marks {
    derived_time: Option<u64>,
    source_block: Option<u64>,
    invalid_derived_time: Option<u64>,
    invalid_source_block: Option<u64>,
}

impl Marks {
    pub(crate) fn apply(&mut self, rule: InvalidationRule) {
        match rule {
            InvalidationRule::DerivedTime(timestamp) => {
                self.invalid_derived_time = lowest(self.invalid_derived_time, timestamp);
            }
            InvalidationRule::SourceBlock(number) => {
                self.invalid_source_block = lowest(self.invalid_source_block, number);
            }
        }
    }

    fn is_valid(&self) -> bool {
        !overlaps(self.derived_time, self.invalid_derived_time) &&
            !overlaps(self.source_block, self.invalid_source_block)
    }
}

fn lowest(current: Option<u64>, value: u64) -> Option<u64> {
    Some(current.map_or(value, |current| current.min(value)))
}

fn highest(current: Option<u64>, value: u64) -> Option<u64> {
    Some(current.map_or(value, |current| current.max(value)))
}

fn overlaps(dependency: Option<u64>, invalidation: Option<u64>) -> bool {
    matches!((dependency, invalidation), (Some(dep), Some(inv)) if inv <= dep)
}

/// Tracks what a multi-step read depends on, so that a concurrent rewind of that data can be
/// detected before acting on the reads.
///
/// Handles are obtained from a [`ReadAcquirer`](super::ReadAcquirer). The handle is unregistered
/// from its registry when released or dropped, after which it keeps its last known validity.
#[derive(Debug)]
pub struct ReadHandle {
    id: u64,
    marks: Arc<Mutex<Marks>>,
    registry: Option<Weak<Mutex<RegistryState>>>,
}

impl ReadHandle {
    pub(crate) const fn new(
        id: u64,
        marks: Arc<Mutex<Marks>>,
        registry: Weak<Mutex<RegistryState>>,
    ) -> Self {
        Self { id, marks, registry: Some(registry) }
    }

    /// Creates a handle that is not registered anywhere and can never be invalidated.
    pub fn detached() -> Self {
        Self { id: 0, marks: Arc::default(), registry: None }
    }

    /// Records a dependency on derived data up to and including the given timestamp.
    pub fn depend_on_derived_time(&self, timestamp: u64) {
        let mut marks = self.marks.lock().unwrap_or_else(PoisonError::into_inner);
        marks.derived_time = highest(marks.derived_time, timestamp);
    }

    /// Records a dependency on source data up to and including the given block number.
    pub fn depend_on_source_block(&self, number: u64) {
        let mut marks = self.marks.lock().unwrap_or_else(PoisonError::into_inner);
        marks.source_block = highest(marks.source_block, number);
    }

    /// Returns `true` if none of the recorded dependencies were invalidated.
    pub fn is_valid(&self) -> bool {
        self.marks.lock().unwrap_or_else(PoisonError::into_inner).is_valid()
    }

    /// Returns [`ReadsError::InvalidatedRead`] if the handle is no longer valid.
    pub fn err(&self) -> Result<(), ReadsError> {
        if self.is_valid() { Ok(()) } else { Err(ReadsError::InvalidatedRead) }
    }

    /// Unregisters the handle from its registry. Calling it more than once has no effect.
    pub fn release(&mut self) {
        let Some(registry) = self.registry.take().and_then(|registry| registry.upgrade()) else {
            return;
        };
        registry.lock().unwrap_or_else(PoisonError::into_inner).remove(self.id);
    }
}

impl Drop for ReadHandle {
    fn drop(&mut self) {
        self.release();
    }
}
