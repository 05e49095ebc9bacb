use alloy_primitives::ChainId;
use thiserror::Error;

/// Reasons a message may not be executed under the interop configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InteropValidationError {
    /// The chain is not part of the dependency set.
    #[error("chain {0} is not part of the dependency set")]
    UnknownChain(ChainId),

    /// Interop is not enabled on one or both chains at the required timestamp.
    #[error("interop not enabled")]
    InteropNotEnabled,

    /// Executing timestamp is earlier than the initiating timestamp.
    #[error(
        "executing timestamp is earlier than initiating timestamp, executing: {executing}, initiating: {initiating}"
    )]
    InvalidTimestampInvariant {
        /// Executing timestamp of the message
        executing: u64,
        /// Initiating timestamp of the message
        initiating: u64,
    },

    /// Timestamp is outside the allowed interop expiry window.
    #[error("timestamp outside allowed interop window, timestamp: {0}")]
    InvalidInteropTimestamp(u64),
}
