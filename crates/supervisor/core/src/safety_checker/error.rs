use crate::reads::ReadsError;
use alloy_eips::BlockNumHash;
use alloy_primitives::{B256, ChainId};
use kona_supervisor_storage::StorageError;
use kona_supervisor_types::ErrorKind;
use thiserror::Error;

/// Errors returned while checking or promoting the cross-chain safety of a block.
///
/// Recovery is decided on [`CrossSafetyError::kind`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CrossSafetyError {
    /// Indicates a failure while accessing storage.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Indicates that the block breaks a cross-chain rule and can never be promoted.
    #[error(transparent)]
    ValidationError(#[from] ValidationError),

    /// Indicates that the reads of the attempt can no longer be trusted.
    #[error(transparent)]
    Reads(#[from] ReadsError),

    /// A dependency is derived from a source block beyond the current scope.
    #[error(
        "block {} (chain {chain_id}) is derived from source block {source_number}, beyond scope {scope_number}",
        .block.number
    )]
    OutOfScope {
        /// The chain of the dependency.
        chain_id: ChainId,
        /// The dependency.
        block: BlockNumHash,
        /// Number of the source block the dependency is derived from.
        source_number: u64,
        /// Number of the last source block in scope.
        scope_number: u64,
    },

    /// The log storage returned a different block than the hazard set refers to.
    #[error(
        "inconsistent block seal on chain {chain_id}: expected {}:{}, found {}:{}",
        .expected.number, .expected.hash, .found.number, .found.hash
    )]
    InconsistentBlockSeal {
        /// The chain of the hazard block.
        chain_id: ChainId,
        /// The hazard block.
        expected: BlockNumHash,
        /// The block found in log storage.
        found: BlockNumHash,
    },

    /// The storage reported an out of scope candidate without a source block to extend from.
    #[error("expected source scope to be set for out of scope candidate on chain {0}")]
    MissingSourceScope(ChainId),
}

impl CrossSafetyError {
    /// Returns the [`ErrorKind`] of the error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Storage(err) => err.kind(),
            Self::ValidationError(_) => ErrorKind::Conflict,
            Self::Reads(err) => err.kind(),
            Self::OutOfScope { .. } => ErrorKind::OutOfScope,
            Self::InconsistentBlockSeal { .. } | Self::MissingSourceScope(_) => ErrorKind::Other,
        }
    }
}

/// Errors returned when block validation fails due to a fatal violation.
/// These errors indicate that the block must be invalidated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The log storage holds a different block than the one being checked.
    #[error(
        "block mismatch on chain {chain_id}: log storage has {}:{}, but expected {}:{}",
        .found.number, .found.hash, .expected.number, .expected.hash
    )]
    BlockMismatch {
        /// The chain of the block.
        chain_id: ChainId,
        /// The block being checked.
        expected: BlockNumHash,
        /// The block found in log storage.
        found: BlockNumHash,
    },

    /// The candidate does not build on top of the current cross unsafe head.
    #[error(
        "block {block_number} (chain {chain_id}) has parent {parent_hash}, but cross unsafe head is {}:{}",
        .head.number, .head.hash
    )]
    ParentMismatch {
        /// The chain of the candidate.
        chain_id: ChainId,
        /// Number of the candidate block.
        block_number: u64,
        /// Parent hash of the candidate block.
        parent_hash: B256,
        /// The current cross unsafe head.
        head: BlockNumHash,
    },

    /// The executing message is not allowed by the interop configuration.
    #[error(
        "executing message at log {log_index} in block {} (chain {chain_id}) may not execute message of chain {initiating_chain_id} at timestamp {initiating_timestamp}",
        .block.number
    )]
    MessageNotExecutable {
        /// The chain of the executing message.
        chain_id: ChainId,
        /// The block containing the executing message.
        block: BlockNumHash,
        /// Log index of the executing message.
        log_index: u32,
        /// The chain of the initiating message.
        initiating_chain_id: ChainId,
        /// Timestamp of the initiating message.
        initiating_timestamp: u64,
    },

    /// Two different blocks of the same chain are required by the candidate.
    #[error(
        "found dependency on {}:{} (chain {chain_id}), but already depend on {}:{}",
        .incoming.number, .incoming.hash, .existing.number, .existing.hash
    )]
    ConflictingDependency {
        /// The chain of the dependencies.
        chain_id: ChainId,
        /// The dependency already in the hazard set.
        existing: BlockNumHash,
        /// The new dependency.
        incoming: BlockNumHash,
    },

    /// The initiating message has a later timestamp than the executing block.
    #[error(
        "timestamp invariant violated: initiating timestamp {initiating_timestamp} is after executing timestamp {executing_timestamp}"
    )]
    TimestampInvariantViolation {
        /// The timestamp of the executing block.
        executing_timestamp: u64,
        /// The timestamp of the initiating message.
        initiating_timestamp: u64,
    },

    /// A local safe block differs from the hazard block at the same height.
    #[error(
        "hazard block {}:{} (chain {chain_id}) does not match local safe candidate {}:{}",
        .expected.number, .expected.hash, .found.number, .found.hash
    )]
    CandidateMismatch {
        /// The chain of the hazard block.
        chain_id: ChainId,
        /// The hazard block.
        expected: BlockNumHash,
        /// The local safe candidate.
        found: BlockNumHash,
    },

    /// An executing message is stored at a log index beyond the block's log count.
    #[error(
        "executing message has invalid log index {log_index} on chain {chain_id}, block has {log_count} logs"
    )]
    InvalidLogIndex {
        /// The chain of the block.
        chain_id: ChainId,
        /// The log index.
        log_index: u32,
        /// Number of logs in the block.
        log_count: u32,
    },

    /// An executing message references a chain that is not part of the hazard set.
    #[error("executing message references unknown chain {0}")]
    UnknownChain(ChainId),

    /// An executing message references itself.
    #[error("self referencing message at log {log_index} on chain {chain_id}")]
    SelfReferencingMessage {
        /// The chain of the message.
        chain_id: ChainId,
        /// Log index of the message.
        log_index: u32,
    },

    /// Cyclic dependency detected between messages with the same timestamp.
    #[error("cyclic dependency detected between messages at timestamp {timestamp}")]
    CyclicDependency {
        /// Timestamp of the messages forming the cycle.
        timestamp: u64,
    },
}
