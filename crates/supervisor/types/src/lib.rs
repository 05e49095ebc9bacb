//! Core types shared across supervisor components.
//!
//! This crate defines the block commitments, cross-chain messages and derivation pairs exchanged
//! between the supervisor storage and the cross-chain safety checker, together with the
//! [`ErrorKind`] vocabulary both sides use to classify failures.

mod depset;
pub use depset::{ChainDependency, DependencySet, MESSAGE_EXPIRY_WINDOW};

mod derived;
pub use derived::{DerivedRefPair, DerivedSealPair};

mod error;
pub use error::ErrorKind;

mod message;
pub use message::{ContainsQuery, ExecutingMessage};

mod types;
pub use types::{BlockRef, BlockSeal, OpenedBlock};

pub use op_alloy_consensus::interop::SafetyLevel;
