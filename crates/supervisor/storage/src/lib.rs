//! Storage interfaces for the Supervisor.
//!
//! This crate defines the contract between the cross-chain safety checker and the storage that
//! persists logs, derivation links and cross-safety heads of every chain:
//!
//! - [`CrossChainSafetyProvider`] exposes the indexed reads and the head updates.
//! - [`StorageError`] reports the outcome of a storage access, classified by
//!   [`ErrorKind`](kona_supervisor_types::ErrorKind).

mod error;
pub use error::{EntryNotFoundError, StorageError};

mod traits;
pub use traits::CrossChainSafetyProvider;
