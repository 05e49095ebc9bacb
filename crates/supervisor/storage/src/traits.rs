use crate::StorageError;
use alloy_eips::eip1898::BlockNumHash;
use alloy_primitives::ChainId;
use kona_supervisor_types::{
    BlockRef, BlockSeal, ContainsQuery, DerivedRefPair, DerivedSealPair, OpenedBlock,
};

/// Provides an interface for retrieving and updating block and safety information across
/// multiple chains.
///
/// This trait defines every storage access required by the cross-chain safety checker: indexed
/// logs, derivation links and the cross-safety heads of each chain.
///
/// Implementations are expected to be thread-safe. Every call is a bounded, indexed lookup.
pub trait CrossChainSafetyProvider {
    /// Opens the sealed block with the given number on the specified chain.
    ///
    /// # Arguments
    /// * `chain_id` - The [`ChainId`] of the target chain.
    /// * `block_number` - The number of the block to open.
    ///
    /// # Returns
    /// * `Ok(OpenedBlock)` with the block reference, its log count and executing messages.
    /// * `Err(StorageError)` if the block is not sealed yet or cannot be read.
    fn open_block(&self, chain_id: ChainId, block_number: u64)
    -> Result<OpenedBlock, StorageError>;

    /// Checks that the log described by `query` is stored on the given chain.
    ///
    /// # Returns
    /// * `Ok(BlockSeal)` of the block that includes the log.
    /// * `Err(StorageError::FutureData)` if the log is not known yet.
    /// * `Err(StorageError::ConflictError)` if the stored log contradicts the query.
    fn contains(&self, chain_id: ChainId, query: ContainsQuery) -> Result<BlockSeal, StorageError>;

    /// Returns the identifier of the canonical block with the given number.
    fn find_block_id(&self, chain_id: ChainId, block_number: u64)
    -> Result<BlockNumHash, StorageError>;

    /// Returns `Ok(())` if the block is cross-unsafe on the given chain.
    fn is_cross_unsafe(&self, chain_id: ChainId, block: BlockNumHash) -> Result<(), StorageError>;

    /// Returns `Ok(())` if the block is part of the local-unsafe chain.
    fn is_local_unsafe(&self, chain_id: ChainId, block: BlockNumHash) -> Result<(), StorageError>;

    /// Returns the current [`CrossUnsafe`] head of the chain.
    ///
    /// Fails with [`StorageError::FutureData`] if the chain has no cross-unsafe head yet.
    ///
    /// [`CrossUnsafe`]: kona_supervisor_types::SafetyLevel::CrossUnsafe
    fn cross_unsafe(&self, chain_id: ChainId) -> Result<BlockSeal, StorageError>;

    /// Returns the current [`CrossSafe`] head of the chain, with the source block it is derived
    /// from.
    ///
    /// [`CrossSafe`]: kona_supervisor_types::SafetyLevel::CrossSafe
    fn cross_safe(&self, chain_id: ChainId) -> Result<DerivedSealPair, StorageError>;

    /// Returns the first source block that the given derived block was cross-derived from.
    ///
    /// # Returns
    /// * `Ok(BlockSeal)` of the source block.
    /// * `Err(StorageError::FutureData)` if the block is not cross-safe yet.
    fn cross_derived_to_source(
        &self,
        chain_id: ChainId,
        derived: BlockNumHash,
    ) -> Result<BlockSeal, StorageError>;

    /// Determines the next local-safe block to consider for cross-safe promotion.
    ///
    /// # Returns
    /// * `Ok(DerivedRefPair)` with the candidate and the source block within the current scope.
    /// * `Err(StorageError::OutOfScope)` if the candidate needs a source block beyond the current
    ///   scope. The error carries the candidate at the edge of the scope.
    /// * `Err(StorageError::AwaitReplacementBlock)` if the next block was invalidated and is not
    ///   replaced yet.
    fn candidate_cross_safe(&self, chain_id: ChainId) -> Result<DerivedRefPair, StorageError>;

    /// Returns the source block that follows `source` in the derivation storage of the chain.
    fn next_source(&self, chain_id: ChainId, source: BlockNumHash)
    -> Result<BlockRef, StorageError>;

    /// Returns the cross-derived block preceding `derived`.
    ///
    /// Returns a zero [`BlockSeal`] if `derived` is the first cross-derived block.
    fn previous_cross_derived(
        &self,
        chain_id: ChainId,
        derived: BlockNumHash,
    ) -> Result<BlockSeal, StorageError>;

    /// Updates the cross-unsafe head of the chain.
    ///
    /// # Arguments
    /// * `chain_id` - The [`ChainId`] of the target chain.
    /// * `block` - The [`BlockSeal`] to set as cross-unsafe head.
    fn update_cross_unsafe(&self, chain_id: ChainId, block: BlockSeal) -> Result<(), StorageError>;

    /// Updates the cross-safe head of the chain.
    ///
    /// # Arguments
    /// * `chain_id` - The [`ChainId`] of the target chain.
    /// * `source` - The source (L1) view the update is made with.
    /// * `derived` - The last derived block that is cross-safe within that view.
    fn update_cross_safe(
        &self,
        chain_id: ChainId,
        source: BlockRef,
        derived: BlockRef,
    ) -> Result<(), StorageError>;

    /// Invalidates the local-safe history of the chain starting at the given candidate.
    ///
    /// The candidate is expected to be replaced by the node later on.
    fn invalidate_local_safe(
        &self,
        chain_id: ChainId,
        candidate: DerivedRefPair,
    ) -> Result<(), StorageError>;
}
