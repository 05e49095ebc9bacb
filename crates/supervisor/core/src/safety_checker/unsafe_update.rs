use super::{
    CrossSafetyError, HazardSet, HazardTier, LinkChecker, ValidationError, check_hazard_cycles,
    check_unsafe_frontier,
};
use crate::reads::ReadAcquirer;
use alloy_primitives::ChainId;
use kona_supervisor_storage::CrossChainSafetyProvider;
use kona_supervisor_types::BlockSeal;
use tracing::{debug, warn};

/// Promotes the block following the cross-unsafe head of `chain_id` to cross-unsafe.
///
/// Returns the promoted block. Fails with [`StorageError::FutureData`] if there is no cross-unsafe
/// head yet, or no block after it.
///
/// [`StorageError::FutureData`]: kona_supervisor_storage::StorageError::FutureData
pub fn cross_unsafe_update<P, R, L>(
    chain_id: ChainId,
    provider: &P,
    reads: &R,
    linker: &L,
) -> Result<BlockSeal, CrossSafetyError>
where
    P: CrossChainSafetyProvider + ?Sized,
    R: ReadAcquirer + ?Sized,
    L: LinkChecker + ?Sized,
{
    let handle = reads.acquire_handle();

    let head = provider.cross_unsafe(chain_id)?;
    let opened = provider.open_block(chain_id, head.number + 1)?;
    if opened.block.parent_hash != head.hash {
        return Err(ValidationError::ParentMismatch {
            chain_id,
            block_number: opened.block.number,
            parent_hash: opened.block.parent_hash,
            head: head.id(),
        }
        .into());
    }

    let candidate = BlockSeal::from(opened.block);
    handle.depend_on_derived_time(candidate.timestamp);
    debug!(
        target: "supervisor::safety_checker",
        chain_id,
        %candidate,
        "Checking cross-unsafe candidate"
    );

    let hazards = HazardSet::build(provider, linker, HazardTier::CrossUnsafe, chain_id, candidate)?;
    check_unsafe_frontier(provider, &hazards)?;
    check_hazard_cycles(provider, candidate.timestamp, &hazards)?;

    if !handle.is_valid() {
        warn!(
            target: "supervisor::reads",
            chain_id,
            %candidate,
            "Cross-unsafe reads were inconsistent, aborting update"
        );
        handle.err()?;
    }
    provider.update_cross_unsafe(chain_id, candidate)?;
    Ok(candidate)
}
