use alloy_eips::BlockNumHash;
use alloy_primitives::ChainId;
use kona_supervisor_types::{DerivedRefPair, ErrorKind};
use thiserror::Error;

/// Errors that may occur while interacting with supervisor storage.
///
/// This enum is used across all implementations of the Storage traits. Callers branch on
/// [`StorageError::kind`] rather than on individual variants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// Represents an error that occurred while accessing a lock.
    #[error("lock poisoned")]
    LockPoisoned,

    /// The expected entry was not found in the database.
    #[error(transparent)]
    EntryNotFound(#[from] EntryNotFoundError),

    /// The chain is not tracked by the storage.
    #[error("unknown chain {0}")]
    UnknownChain(ChainId),

    /// Represents an error that occurred while getting data that is not yet available.
    #[error("data not yet available")]
    FutureData,

    /// Represents a conflict between the queried data and the stored data.
    #[error("conflicting data")]
    ConflictError,

    /// The next cross-safe candidate is derived from a source block beyond the current scope.
    ///
    /// The candidate is returned so that the caller can widen the scope starting from its source.
    #[error("candidate out of scope, {candidate}")]
    OutOfScope {
        /// The candidate that could not be reached within the current scope.
        candidate: Box<DerivedRefPair>,
    },

    /// An invalidated local-safe block has to be replaced before the chain can progress.
    #[error("awaiting replacement of invalidated block")]
    AwaitReplacementBlock,
}

impl StorageError {
    /// Returns the [`ErrorKind`] of the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::FutureData => ErrorKind::Future,
            Self::ConflictError => ErrorKind::Conflict,
            Self::OutOfScope { .. } => ErrorKind::OutOfScope,
            Self::AwaitReplacementBlock => ErrorKind::AwaitReplacementBlock,
            Self::LockPoisoned | Self::EntryNotFound(_) | Self::UnknownChain(_) => ErrorKind::Other,
        }
    }

    /// Creates an [`StorageError::OutOfScope`] error for the given candidate.
    pub fn out_of_scope(candidate: DerivedRefPair) -> Self {
        Self::OutOfScope { candidate: Box::new(candidate) }
    }
}

/// Entry not found error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntryNotFoundError {
    /// Expected source block not found.
    #[error("source block not found, number: {0}")]
    SourceBlockNotFound(u64),

    /// Expected derived block not found.
    #[error("derived block not found, number: {}, hash: {}", .0.number, .0.hash)]
    DerivedBlockNotFound(BlockNumHash),

    /// Expected log not found.
    #[error("log not found at block {block_number} index {log_index}")]
    LogNotFound {
        /// Block number.
        block_number: u64,
        /// Log index within the block.
        log_index: u32,
    },
}
