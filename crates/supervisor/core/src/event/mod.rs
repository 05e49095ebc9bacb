//! Events emitted by the cross-chain safety checker.

mod chain;
pub use chain::ChainEvent;
