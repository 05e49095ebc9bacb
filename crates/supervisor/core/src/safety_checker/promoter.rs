use super::{CrossSafeOutcome, LinkChecker, cross_safe_update, cross_unsafe_update};
use crate::{
    CrossSafetyError, event::ChainEvent, reads::ReadAcquirer,
    safety_checker::traits::SafetyPromoter,
};
use alloy_primitives::ChainId;
use kona_supervisor_storage::CrossChainSafetyProvider;
use op_alloy_consensus::interop::SafetyLevel;

/// CrossUnsafePromoter implements [`SafetyPromoter`] for [`SafetyLevel::CrossUnsafe`]
#[derive(Debug)]
pub struct CrossUnsafePromoter;

impl SafetyPromoter for CrossUnsafePromoter {
    fn target_level(&self) -> SafetyLevel {
        SafetyLevel::CrossUnsafe
    }

    fn lower_bound_level(&self) -> SafetyLevel {
        SafetyLevel::LocalUnsafe
    }

    fn promote(
        &self,
        chain_id: ChainId,
        provider: &dyn CrossChainSafetyProvider,
        reads: &dyn ReadAcquirer,
        linker: &dyn LinkChecker,
    ) -> Result<ChainEvent, CrossSafetyError> {
        let block = cross_unsafe_update(chain_id, provider, reads, linker)?;
        Ok(ChainEvent::CrossUnsafeUpdate { block })
    }
}

/// CrossSafePromoter implements [`SafetyPromoter`] for [`SafetyLevel::CrossSafe`]
#[derive(Debug)]
pub struct CrossSafePromoter;

impl SafetyPromoter for CrossSafePromoter {
    fn target_level(&self) -> SafetyLevel {
        SafetyLevel::CrossSafe
    }

    fn lower_bound_level(&self) -> SafetyLevel {
        SafetyLevel::LocalSafe
    }

    fn promote(
        &self,
        chain_id: ChainId,
        provider: &dyn CrossChainSafetyProvider,
        reads: &dyn ReadAcquirer,
        linker: &dyn LinkChecker,
    ) -> Result<ChainEvent, CrossSafetyError> {
        let event = match cross_safe_update(chain_id, provider, reads, linker)? {
            CrossSafeOutcome::Promoted(derived_ref_pair) |
            CrossSafeOutcome::ScopeExtended(derived_ref_pair) => {
                ChainEvent::CrossSafeUpdate { derived_ref_pair }
            }
            CrossSafeOutcome::Invalidated(candidate) => {
                ChainEvent::LocalSafeInvalidated { candidate }
            }
        };
        Ok(event)
    }
}
