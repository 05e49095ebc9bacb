use kona_supervisor_types::ErrorKind;
use thiserror::Error;

/// Errors reported by the [`ReadRegistry`](super::ReadRegistry) and its handles.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReadsError {
    /// Another invalidation is still in progress.
    #[error("already invalidating")]
    AlreadyInvalidating,

    /// The reads tracked by a handle were invalidated by a concurrent rewind.
    #[error("reads were invalidated")]
    InvalidatedRead,
}

impl ReadsError {
    /// Returns the [`ErrorKind`] of the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyInvalidating => ErrorKind::Other,
            Self::InvalidatedRead => ErrorKind::InvalidatedRead,
        }
    }
}
