use super::{
    CrossSafetyError, HazardSet, HazardTier, LinkChecker, check_hazard_cycles,
    check_safe_frontier,
};
use crate::reads::{ReadAcquirer, ReadHandle};
use alloy_eips::BlockNumHash;
use alloy_primitives::ChainId;
use kona_supervisor_storage::{CrossChainSafetyProvider, StorageError};
use kona_supervisor_types::{BlockSeal, DerivedRefPair, ErrorKind};
use tracing::{debug, info, warn};

/// The result of a successful cross-safe update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossSafeOutcome {
    /// The local-safe candidate was promoted to cross-safe.
    Promoted(DerivedRefPair),
    /// No candidate could be promoted within the current source scope. The current cross-safe
    /// block was recorded again, derived from the next source block.
    ScopeExtended(DerivedRefPair),
    /// The local-safe candidate conflicts with other chains and was invalidated.
    Invalidated(DerivedRefPair),
}

/// Runs one cross-safe update of `chain_id`.
///
/// Promotes the local-safe candidate if all of its dependencies are cross-safe within its source
/// scope. If the candidate needs data from a later source block, the scope is extended instead.
/// A candidate that conflicts with other chains is invalidated.
///
/// # Errors
/// * [`StorageError::FutureData`] if there is nothing to promote yet.
/// * [`StorageError::AwaitReplacementBlock`] if an invalidated block has not been replaced yet.
/// * [`ReadsError::InvalidatedRead`](crate::reads::ReadsError::InvalidatedRead) if data read
///   during the update was rewound concurrently. Nothing is written in that case.
pub fn cross_safe_update<P, R, L>(
    chain_id: ChainId,
    provider: &P,
    reads: &R,
    linker: &L,
) -> Result<CrossSafeOutcome, CrossSafetyError>
where
    P: CrossChainSafetyProvider + ?Sized,
    R: ReadAcquirer + ?Sized,
    L: LinkChecker + ?Sized,
{
    let handle = reads.acquire_handle();
    debug!(target: "supervisor::safety_checker", chain_id, "Cross-safe update");

    let candidate = match provider.candidate_cross_safe(chain_id) {
        Ok(candidate) => candidate,
        Err(StorageError::OutOfScope { candidate }) => {
            track_candidate(&handle, &candidate);
            return extend_scope(chain_id, provider, &handle, *candidate);
        }
        Err(err) => return Err(err.into()),
    };
    track_candidate(&handle, &candidate);

    let err = match check_candidate(chain_id, provider, linker, &candidate) {
        Ok(()) => {
            if !handle.is_valid() {
                warn!(
                    target: "supervisor::reads",
                    chain_id,
                    %candidate,
                    "Cross-safe reads were inconsistent, aborting update"
                );
                handle.err()?;
            }
            provider.update_cross_safe(chain_id, candidate.source, candidate.derived)?;
            return Ok(CrossSafeOutcome::Promoted(candidate));
        }
        Err(err) => err,
    };

    match err.kind() {
        ErrorKind::AwaitReplacementBlock => {
            info!(
                target: "supervisor::safety_checker",
                chain_id,
                %err,
                "Awaiting replacement block"
            );
            Err(err)
        }
        ErrorKind::Conflict => {
            warn!(
                target: "supervisor::safety_checker",
                chain_id,
                scope = %candidate.source,
                invalidated = %candidate.derived,
                %err,
                "Found a conflicting local-safe block that cannot be promoted to cross-safe"
            );
            handle.err()?;
            provider.invalidate_local_safe(chain_id, candidate)?;
            Ok(CrossSafeOutcome::Invalidated(candidate))
        }
        ErrorKind::OutOfScope => extend_scope(chain_id, provider, &handle, candidate),
        _ => Err(err),
    }
}

/// Validates the candidate against the other chains, without writing anything.
fn check_candidate<P, L>(
    chain_id: ChainId,
    provider: &P,
    linker: &L,
    candidate: &DerivedRefPair,
) -> Result<(), CrossSafetyError>
where
    P: CrossChainSafetyProvider + ?Sized,
    L: LinkChecker + ?Sized,
{
    let scope = candidate.source.id();
    let block = BlockSeal::from(candidate.derived);

    let tier = HazardTier::CrossSafe { scope };
    let hazards = HazardSet::build(provider, linker, tier, chain_id, block)?;
    check_safe_frontier(provider, scope, &hazards)?;
    check_hazard_cycles(provider, block.timestamp, &hazards)
}

fn track_candidate(handle: &ReadHandle, candidate: &DerivedRefPair) {
    handle.depend_on_source_block(candidate.source.number);
    handle.depend_on_derived_time(candidate.derived.timestamp);
}

/// Records the current cross-safe block again, derived from the source block after the
/// candidate's scope.
fn extend_scope<P>(
    chain_id: ChainId,
    provider: &P,
    handle: &ReadHandle,
    candidate: DerivedRefPair,
) -> Result<CrossSafeOutcome, CrossSafetyError>
where
    P: CrossChainSafetyProvider + ?Sized,
{
    if candidate.source.is_zero() {
        return Err(CrossSafetyError::MissingSourceScope(chain_id));
    }
    debug!(
        target: "supervisor::safety_checker",
        chain_id,
        scope = %candidate.source,
        "Cross-safe update ran out of source scope"
    );

    handle.depend_on_source_block(candidate.source.number + 1);
    let new_scope = provider.next_source(chain_id, candidate.source.id())?;
    let current = provider.cross_safe(chain_id)?;
    let parent = provider.previous_cross_derived(chain_id, current.derived.id())?;

    // The parent is unknown for the first block after interop activation.
    let cross_safe = if parent.id() == BlockNumHash::default() {
        current.derived.with_zero_parent()
    } else {
        current.derived.with_parent(parent.hash)
    };

    if !handle.is_valid() {
        warn!(
            target: "supervisor::reads",
            chain_id,
            scope = %new_scope,
            "Cross-safe reads were inconsistent, aborting scope extension"
        );
        handle.err()?;
    }

    debug!(
        target: "supervisor::safety_checker",
        chain_id,
        scope = %new_scope,
        cross_safe = %cross_safe,
        "Extending cross-safe scope"
    );
    provider.update_cross_safe(chain_id, new_scope, cross_safe)?;
    Ok(CrossSafeOutcome::ScopeExtended(DerivedRefPair::new(new_scope, cross_safe)))
}
