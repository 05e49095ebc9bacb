//! Optimistic read consistency.
//!
//! A promotion reads from storage in several steps before writing its outcome. Instead of locking
//! the chains involved, each attempt records what it read on a [`ReadHandle`]. A rewind calls
//! [`Invalidator::try_invalidate`] before mutating storage, which taints every handle that read
//! the rewound data. The attempt checks [`ReadHandle::is_valid`] right before writing.

mod error;
pub use error::ReadsError;

mod handle;
pub use handle::ReadHandle;

mod registry;
pub use registry::{InvalidationGuard, InvalidationRule, Invalidator, ReadAcquirer, ReadRegistry};
