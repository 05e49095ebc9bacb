//! This crate contains the cross-chain safety logic of the Optimism Supervisor.
//!
//! Blocks of interop chains are promoted from local to cross safety levels once every message
//! they execute is known to be valid across all chains of the dependency set.

pub mod config;
pub mod event;
pub mod reads;

pub mod safety_checker;
pub use safety_checker::{CrossSafetyCheckerJob, CrossSafetyError, LinkChecker};

#[cfg(test)]
mod test_util;
