use alloy_primitives::{B256, ChainId};
use serde::{Deserialize, Serialize};

/// A parsed executing message extracted from a log emitted by the
/// `CrossL2Inbox` contract on an L2 chain.
///
/// The message references an initiating log on `chain_id`, which must have been emitted in block
/// `block_number` at `log_index`, no later than `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutingMessage {
    /// The chain ID where the initiating message was emitted.
    pub chain_id: ChainId,
    /// The block number that contains the initiating log.
    pub block_number: u64,
    /// The log index of the initiating log within its block.
    pub log_index: u32,
    /// The timestamp of the initiating block.
    pub timestamp: u64,
    /// Checksum binding the executing message to the initiating log payload and origin.
    pub checksum: B256,
}

/// A lookup of an initiating log in the log storage of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainsQuery {
    /// Expected timestamp of the block containing the log.
    pub timestamp: u64,
    /// Expected number of the block containing the log.
    pub block_number: u64,
    /// Index of the log within the block.
    pub log_index: u32,
    /// Expected checksum of the log.
    pub checksum: B256,
}

impl From<&ExecutingMessage> for ContainsQuery {
    fn from(msg: &ExecutingMessage) -> Self {
        Self {
            timestamp: msg.timestamp,
            block_number: msg.block_number,
            log_index: msg.log_index,
            checksum: msg.checksum,
        }
    }
}
