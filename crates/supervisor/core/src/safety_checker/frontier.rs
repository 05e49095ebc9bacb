use super::{CrossSafetyError, HazardSet, ValidationError};
use alloy_eips::BlockNumHash;
use kona_supervisor_storage::{CrossChainSafetyProvider, StorageError};
use tracing::trace;

/// Checks that every hazard block is cross-unsafe, or at most one block ahead of the cross-unsafe
/// head of its chain.
///
/// A hazard that is not yet cross-unsafe must at least be local-unsafe, and its parent must be
/// cross-unsafe already.
pub fn check_unsafe_frontier<P>(provider: &P, hazards: &HazardSet) -> Result<(), CrossSafetyError>
where
    P: CrossChainSafetyProvider + ?Sized,
{
    for (chain_id, hazard) in hazards.entries() {
        match provider.is_cross_unsafe(chain_id, hazard.id()) {
            Ok(()) => continue,
            Err(StorageError::FutureData) => {}
            Err(err) => return Err(err.into()),
        }

        trace!(
            target: "supervisor::safety_checker",
            chain_id,
            %hazard,
            "Hazard is not cross-unsafe yet, checking its parent"
        );
        provider.is_local_unsafe(chain_id, hazard.id())?;
        if hazard.number > 0 {
            let parent = provider.find_block_id(chain_id, hazard.number - 1)?;
            provider.is_cross_unsafe(chain_id, parent)?;
        }
    }
    Ok(())
}

/// Checks that every hazard block is cross-safe, or the local-safe candidate of its chain, with a
/// source block no later than `scope`.
///
/// # Errors
/// * [`CrossSafetyError::OutOfScope`] if a hazard depends on a source block beyond `scope`.
/// * [`ValidationError::CandidateMismatch`] if a hazard that is not cross-safe yet is not the
///   candidate of its chain either.
/// * [`StorageError::FutureData`] if a hazard chain has no candidate within its own scope yet.
pub fn check_safe_frontier<P>(
    provider: &P,
    scope: BlockNumHash,
    hazards: &HazardSet,
) -> Result<(), CrossSafetyError>
where
    P: CrossChainSafetyProvider + ?Sized,
{
    for (chain_id, hazard) in hazards.entries() {
        let source_number = match provider.cross_derived_to_source(chain_id, hazard.id()) {
            Ok(source) => source.number,
            Err(StorageError::FutureData) => {
                // Out of scope of the hazard chain itself means there is nothing to wait for yet.
                let candidate = provider.candidate_cross_safe(chain_id).map_err(|err| match err {
                    StorageError::OutOfScope { .. } => StorageError::FutureData,
                    err => err,
                })?;
                if candidate.derived.id() != hazard.id() {
                    return Err(ValidationError::CandidateMismatch {
                        chain_id,
                        expected: hazard.id(),
                        found: candidate.derived.id(),
                    }
                    .into());
                }
                candidate.source.number
            }
            Err(err) => return Err(err.into()),
        };

        if source_number > scope.number {
            return Err(CrossSafetyError::OutOfScope {
                chain_id,
                block: hazard.id(),
                source_number,
                scope_number: scope.number,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{MockProvider, StorageBuilder, b256, source_ref};
    use alloy_primitives::ChainId;
    use kona_supervisor_types::{BlockRef, BlockSeal, DerivedRefPair, ErrorKind};

    const CHAIN_A: ChainId = 123;

    fn hazard(number: u64, hash: u64) -> HazardSet {
        HazardSet::from_entries([(CHAIN_A, BlockSeal::new(b256(hash), number, 0))])
    }

    fn scope(number: u64) -> BlockNumHash {
        BlockNumHash { number, hash: b256(1000 + number) }
    }

    fn derived(number: u64, hash: u64) -> BlockRef {
        BlockRef::new(b256(hash), number, b256(0), 0)
    }

    #[test]
    fn test_safe_frontier_empty_hazards() {
        let provider = MockProvider::new();
        check_safe_frontier(&provider, scope(0), &HazardSet::default()).unwrap();
    }

    #[test]
    fn test_safe_frontier_source_in_scope() {
        let mut provider = MockProvider::new();
        provider
            .expect_cross_derived_to_source()
            .returning(|_, _| Ok(BlockSeal::new(b256(1), 1, 0)));

        check_safe_frontier(&provider, scope(2), &hazard(3, 3)).unwrap();
    }

    #[test]
    fn test_safe_frontier_source_at_scope() {
        let mut provider = MockProvider::new();
        provider
            .expect_cross_derived_to_source()
            .returning(|_, _| Ok(BlockSeal::new(b256(2), 2, 0)));

        check_safe_frontier(&provider, scope(2), &hazard(3, 3)).unwrap();
    }

    #[test]
    fn test_safe_frontier_source_out_of_scope() {
        let mut provider = MockProvider::new();
        provider
            .expect_cross_derived_to_source()
            .returning(|_, _| Ok(BlockSeal::new(b256(3), 3, 0)));

        let err = check_safe_frontier(&provider, scope(2), &hazard(3, 3)).unwrap_err();
        assert_eq!(
            err,
            CrossSafetyError::OutOfScope {
                chain_id: CHAIN_A,
                block: BlockNumHash { number: 3, hash: b256(3) },
                source_number: 3,
                scope_number: 2,
            }
        );
        assert_eq!(err.kind(), ErrorKind::OutOfScope);
    }

    #[test]
    fn test_safe_frontier_candidate_error_is_propagated() {
        let mut provider = MockProvider::new();
        provider.expect_cross_derived_to_source().returning(|_, _| Err(StorageError::FutureData));
        provider.expect_candidate_cross_safe().returning(|_| Err(StorageError::LockPoisoned));

        let err = check_safe_frontier(&provider, scope(0), &hazard(3, 2)).unwrap_err();
        assert_eq!(err, CrossSafetyError::Storage(StorageError::LockPoisoned));
    }

    #[test]
    fn test_safe_frontier_candidate_mismatch() {
        let mut provider = MockProvider::new();
        provider.expect_cross_derived_to_source().returning(|_, _| Err(StorageError::FutureData));
        provider
            .expect_candidate_cross_safe()
            .returning(|_| Ok(DerivedRefPair::new(BlockRef::default(), derived(3, 1))));

        let err = check_safe_frontier(&provider, scope(0), &hazard(3, 2)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::CandidateMismatch {
                chain_id: CHAIN_A,
                expected: BlockNumHash { number: 3, hash: b256(2) },
                found: BlockNumHash { number: 3, hash: b256(1) },
            }
            .into()
        );
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_safe_frontier_candidate_out_of_scope() {
        let mut provider = MockProvider::new();
        provider.expect_cross_derived_to_source().returning(|_, _| Err(StorageError::FutureData));
        provider
            .expect_candidate_cross_safe()
            .returning(|_| Ok(DerivedRefPair::new(source_ref(9), derived(3, 2))));

        let err = check_safe_frontier(&provider, scope(8), &hazard(3, 2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfScope);
    }

    #[test]
    fn test_safe_frontier_candidate_in_scope() {
        let mut provider = MockProvider::new();
        provider.expect_cross_derived_to_source().returning(|_, _| Err(StorageError::FutureData));
        provider
            .expect_candidate_cross_safe()
            .returning(|_| Ok(DerivedRefPair::new(source_ref(8), derived(3, 2))));

        check_safe_frontier(&provider, scope(8), &hazard(3, 2)).unwrap();
    }

    #[test]
    fn test_safe_frontier_source_lookup_error() {
        let mut provider = MockProvider::new();
        provider
            .expect_cross_derived_to_source()
            .returning(|_, _| Err(StorageError::UnknownChain(CHAIN_A)));
        provider.expect_candidate_cross_safe().never();

        let err = check_safe_frontier(&provider, scope(8), &hazard(3, 2)).unwrap_err();
        assert_eq!(err, CrossSafetyError::Storage(StorageError::UnknownChain(CHAIN_A)));
    }

    #[test]
    fn test_safe_frontier_hazard_chain_out_of_scope_is_future() {
        let mut provider = MockProvider::new();
        provider.expect_cross_derived_to_source().returning(|_, _| Err(StorageError::FutureData));
        provider.expect_candidate_cross_safe().returning(|_| {
            Err(StorageError::out_of_scope(DerivedRefPair::new(source_ref(9), derived(3, 2))))
        });

        let err = check_safe_frontier(&provider, scope(8), &hazard(3, 2)).unwrap_err();
        assert_eq!(err, CrossSafetyError::Storage(StorageError::FutureData));
        assert_eq!(err.kind(), ErrorKind::Future);
    }

    #[test]
    fn test_unsafe_frontier_empty_hazards() {
        let provider = MockProvider::new();
        check_unsafe_frontier(&provider, &HazardSet::default()).unwrap();
    }

    #[test]
    fn test_unsafe_frontier_cross_unsafe_hazard() {
        let mut builder = StorageBuilder::new();
        builder.chain(CHAIN_A).block(0, 0, 0).block(1, 2, 0).cross_unsafe(1);
        let storage = builder.build();

        let hazards = HazardSet::from_entries([(CHAIN_A, storage.seal(CHAIN_A, 1))]);
        check_unsafe_frontier(&storage, &hazards).unwrap();
    }

    #[test]
    fn test_unsafe_frontier_one_ahead_of_head() {
        let mut builder = StorageBuilder::new();
        builder.chain(CHAIN_A).block(0, 0, 0).block(1, 2, 0).cross_unsafe(0);
        let storage = builder.build();

        let hazards = HazardSet::from_entries([(CHAIN_A, storage.seal(CHAIN_A, 1))]);
        check_unsafe_frontier(&storage, &hazards).unwrap();
    }

    #[test]
    fn test_unsafe_frontier_two_ahead_of_head() {
        let mut builder = StorageBuilder::new();
        builder.chain(CHAIN_A).block(0, 0, 0).block(1, 2, 0).block(2, 4, 0).cross_unsafe(0);
        let storage = builder.build();

        let hazards = HazardSet::from_entries([(CHAIN_A, storage.seal(CHAIN_A, 2))]);
        let err = check_unsafe_frontier(&storage, &hazards).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Future);
    }

    #[test]
    fn test_unsafe_frontier_genesis_hazard() {
        let mut builder = StorageBuilder::new();
        builder.chain(CHAIN_A).block(0, 0, 0);
        let storage = builder.build();

        let hazards = HazardSet::from_entries([(CHAIN_A, storage.seal(CHAIN_A, 0))]);
        check_unsafe_frontier(&storage, &hazards).unwrap();
    }

    #[test]
    fn test_unsafe_frontier_not_local_unsafe() {
        let mut provider = MockProvider::new();
        provider.expect_is_cross_unsafe().returning(|_, _| Err(StorageError::FutureData));
        provider.expect_is_local_unsafe().returning(|_, _| Err(StorageError::ConflictError));
        provider.expect_find_block_id().never();

        let err = check_unsafe_frontier(&provider, &hazard(3, 3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_unsafe_frontier_cross_unsafe_error_is_propagated() {
        let mut provider = MockProvider::new();
        provider.expect_is_cross_unsafe().returning(|_, _| Err(StorageError::ConflictError));
        provider.expect_is_local_unsafe().never();

        let err = check_unsafe_frontier(&provider, &hazard(3, 3)).unwrap_err();
        assert_eq!(err, CrossSafetyError::Storage(StorageError::ConflictError));
    }

    #[test]
    fn test_unsafe_frontier_parent_lookup_error() {
        let mut provider = MockProvider::new();
        provider.expect_is_cross_unsafe().returning(|_, _| Err(StorageError::FutureData));
        provider.expect_is_local_unsafe().returning(|_, _| Ok(()));
        provider.expect_find_block_id().returning(|_, _| Err(StorageError::LockPoisoned));

        let err = check_unsafe_frontier(&provider, &hazard(3, 3)).unwrap_err();
        assert_eq!(err, CrossSafetyError::Storage(StorageError::LockPoisoned));
    }
}
