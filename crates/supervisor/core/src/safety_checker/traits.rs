use crate::{CrossSafetyError, event::ChainEvent, reads::ReadAcquirer};
use alloy_primitives::ChainId;
use auto_impl::auto_impl;
use kona_supervisor_storage::CrossChainSafetyProvider;
use op_alloy_consensus::interop::SafetyLevel;

/// Policy deciding which chains may execute messages of which other chains, and when.
#[auto_impl(&, Arc)]
pub trait LinkChecker {
    /// Returns `true` if a block of `executing_chain_id` at `executing_timestamp` may execute a
    /// message initiated on `initiating_chain_id` at `initiating_timestamp`.
    fn can_execute(
        &self,
        executing_chain_id: ChainId,
        executing_timestamp: u64,
        initiating_chain_id: ChainId,
        initiating_timestamp: u64,
    ) -> bool;
}

/// Defines the logic for promoting a block to a specific [`SafetyLevel`].
///
/// Each implementation handles:
/// - Which safety level it promotes to
/// - Its required lower bound
/// - Running a single promotion attempt and generating the corresponding [`ChainEvent`]
pub trait SafetyPromoter {
    /// Target safety level this promoter upgrades to.
    fn target_level(&self) -> SafetyLevel;

    /// Required lower bound level for promotion eligibility.
    fn lower_bound_level(&self) -> SafetyLevel;

    /// Runs one promotion attempt on the chain and returns the event to broadcast.
    fn promote(
        &self,
        chain_id: ChainId,
        provider: &dyn CrossChainSafetyProvider,
        reads: &dyn ReadAcquirer,
        linker: &dyn LinkChecker,
    ) -> Result<ChainEvent, CrossSafetyError>;
}
