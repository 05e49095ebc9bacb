//! Block commitments exchanged between the supervisor storage and the safety checker.

use alloy_eips::BlockNumHash;
use alloy_primitives::B256;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ExecutingMessage;

/// Represents a sealed block with its hash, number, and timestamp.
///
/// A seal commits to exactly one block but carries no parent link, see [`BlockRef`] for that.
#[derive(Debug, Clone, Copy, Default, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display("number: {number}, hash: {hash}, timestamp: {timestamp}")]
#[serde(rename_all = "camelCase")]
pub struct BlockSeal {
    /// The block's hash
    pub hash: B256,
    /// The block number
    pub number: u64,
    /// The block's timestamp
    pub timestamp: u64,
}

impl BlockSeal {
    /// Creates a new [`BlockSeal`] with the given hash, number, and timestamp.
    pub const fn new(hash: B256, number: u64, timestamp: u64) -> Self {
        Self { hash, number, timestamp }
    }

    /// Returns the [`BlockNumHash`] identifying this block.
    pub const fn id(&self) -> BlockNumHash {
        BlockNumHash { number: self.number, hash: self.hash }
    }

    /// Links the seal to the given parent hash.
    pub const fn with_parent(self, parent_hash: B256) -> BlockRef {
        BlockRef {
            hash: self.hash,
            number: self.number,
            parent_hash,
            timestamp: self.timestamp,
        }
    }

    /// Links the seal to the zero hash, for blocks whose parent is unknown or absent.
    pub const fn with_zero_parent(self) -> BlockRef {
        self.with_parent(B256::ZERO)
    }
}

impl From<BlockRef> for BlockSeal {
    fn from(block: BlockRef) -> Self {
        Self { hash: block.hash, number: block.number, timestamp: block.timestamp }
    }
}

/// A [`BlockSeal`] extended with the hash of its parent.
///
/// Used wherever chain linkage has to be verified, e.g. when checking that a candidate builds on
/// top of the current cross-unsafe head.
#[derive(Debug, Clone, Copy, Default, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display("number: {number}, hash: {hash}, parent: {parent_hash}, timestamp: {timestamp}")]
#[serde(rename_all = "camelCase")]
pub struct BlockRef {
    /// The block's hash
    pub hash: B256,
    /// The block number
    pub number: u64,
    /// The hash of the parent block
    pub parent_hash: B256,
    /// The block's timestamp
    pub timestamp: u64,
}

impl BlockRef {
    /// Creates a new [`BlockRef`].
    pub const fn new(hash: B256, number: u64, parent_hash: B256, timestamp: u64) -> Self {
        Self { hash, number, parent_hash, timestamp }
    }

    /// Returns the [`BlockNumHash`] identifying this block.
    pub const fn id(&self) -> BlockNumHash {
        BlockNumHash { number: self.number, hash: self.hash }
    }

    /// Returns the [`BlockNumHash`] of the parent block.
    ///
    /// Saturates at zero for the genesis block.
    pub const fn parent_id(&self) -> BlockNumHash {
        BlockNumHash { number: self.number.saturating_sub(1), hash: self.parent_hash }
    }

    /// Returns `true` if every field is unset.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// The contents of a sealed block as indexed by the log storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenedBlock {
    /// Reference of the opened block.
    pub block: BlockRef,
    /// Number of logs emitted in the block.
    pub log_count: u32,
    /// Executing messages in the block, keyed by the index of the log that carries them.
    pub executing_messages: BTreeMap<u32, ExecutingMessage>,
}
