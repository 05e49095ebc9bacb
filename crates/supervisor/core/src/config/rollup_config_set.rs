use alloy_primitives::ChainId;
use kona_supervisor_types::BlockSeal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// RollupConfig contains the interop related configuration of an Optimism rollup.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupConfig {
    /// The block time of the L2, in seconds.
    pub block_time: u64,

    /// Activation time for the interop network upgrade.
    pub interop_time: Option<u64>,
}

impl RollupConfig {
    /// Creates a new RollupConfig with the given block time and interop activation time.
    pub const fn new(block_time: u64, interop_time: Option<u64>) -> Self {
        Self { block_time, interop_time }
    }

    /// Returns `true` if the timestamp is at or after the interop activation time.
    ///
    /// Returns `false` if `interop_time` is not configured.
    pub fn is_interop(&self, timestamp: u64) -> bool {
        self.interop_time.is_some_and(|t| timestamp >= t)
    }

    /// Returns `true` if the timestamp is strictly after the interop activation block.
    ///
    /// Interop activates at [`interop_time`](Self::interop_time). This function checks whether the
    /// provided timestamp is *after* that activation, skipping the activation block
    /// itself.
    ///
    /// Returns `false` if `interop_time` is not configured.
    pub fn is_post_interop(&self, timestamp: u64) -> bool {
        self.is_interop(timestamp.saturating_sub(self.block_time))
    }

    /// Returns `true` if given block is the interop activation block.
    ///
    /// An interop activation block is defined as the block that is right after the
    /// interop activation time.
    pub fn is_interop_activation_block(&self, block: BlockSeal) -> bool {
        self.is_interop(block.timestamp) &&
            !self.is_interop(block.timestamp.saturating_sub(self.block_time))
    }
}

/// RollupConfigSet contains the configuration for multiple Optimism rollups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupConfigSet {
    /// The rollup configurations, by chain ID.
    pub rollups: HashMap<ChainId, RollupConfig>,
}

impl RollupConfigSet {
    /// Creates a new RollupConfigSet with the given rollup configurations.
    pub const fn new(rollups: HashMap<ChainId, RollupConfig>) -> Self {
        Self { rollups }
    }

    /// Returns the rollup configuration for the given chain id.
    pub fn get(&self, chain_id: ChainId) -> Option<&RollupConfig> {
        self.rollups.get(&chain_id)
    }

    /// Returns `true` if interop is enabled for the chain at given timestamp.
    ///
    /// Unknown chains are never interop enabled.
    pub fn is_post_interop(&self, chain_id: ChainId, timestamp: u64) -> bool {
        self.get(chain_id).is_some_and(|cfg| cfg.is_post_interop(timestamp))
    }

    /// Returns `true` if given block is the interop activation block for the specified chain.
    pub fn is_interop_activation_block(&self, chain_id: ChainId, block: BlockSeal) -> bool {
        self.get(chain_id).is_some_and(|cfg| cfg.is_interop_activation_block(block))
    }
}
