use super::{CrossSafetyError, LinkChecker, ValidationError};
use alloy_eips::BlockNumHash;
use alloy_primitives::ChainId;
use kona_supervisor_storage::CrossChainSafetyProvider;
use kona_supervisor_types::{BlockSeal, ContainsQuery};
use std::{
    cmp::Ordering,
    collections::{BTreeMap, btree_map::Entry},
};
use tracing::{debug, trace};

/// The safety tier that initiating blocks with an earlier timestamp than the executing block must
/// have reached already.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardTier {
    /// Initiating blocks must be cross-unsafe.
    CrossUnsafe,
    /// Initiating blocks must be cross-safe, derived from a source block within `scope`.
    CrossSafe {
        /// The last source block in scope.
        scope: BlockNumHash,
    },
}

impl HazardTier {
    /// Checks that `block` on `chain_id` is valid at this tier.
    pub fn is_cross_valid_block<P>(
        &self,
        provider: &P,
        chain_id: ChainId,
        block: BlockNumHash,
    ) -> Result<(), CrossSafetyError>
    where
        P: CrossChainSafetyProvider + ?Sized,
    {
        match self {
            Self::CrossUnsafe => Ok(provider.is_cross_unsafe(chain_id, block)?),
            Self::CrossSafe { scope } => {
                let source = provider.cross_derived_to_source(chain_id, block)?;
                if source.number > scope.number {
                    return Err(CrossSafetyError::OutOfScope {
                        chain_id,
                        block,
                        source_number: source.number,
                        scope_number: scope.number,
                    });
                }
                Ok(())
            }
        }
    }
}

/// The blocks that have to be verified together with a candidate block, at most one per chain.
///
/// A hazard is a block whose logs are executed by a message with the same timestamp as the
/// executing block. Such blocks cannot be assumed to be valid on their own, since they may in
/// turn depend on the candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HazardSet {
    entries: BTreeMap<ChainId, BlockSeal>,
}

impl HazardSet {
    /// Collects the hazards of `candidate` on `chain_id`, following hazards transitively.
    ///
    /// Messages with an earlier timestamp than their executing block are resolved against `tier`
    /// instead of being recorded.
    ///
    /// # Errors
    /// Fails with a [`ValidationError`] if any message may not be executed, breaks the timestamp
    /// invariant, or if two different blocks of the same chain are required.
    pub fn build<P, L>(
        provider: &P,
        linker: &L,
        tier: HazardTier,
        chain_id: ChainId,
        candidate: BlockSeal,
    ) -> Result<Self, CrossSafetyError>
    where
        P: CrossChainSafetyProvider + ?Sized,
        L: LinkChecker + ?Sized,
    {
        debug!(target: "supervisor::safety_checker", chain_id, %candidate, "Building hazard set");

        let mut hazards = Self::default();
        let mut pending = vec![(chain_id, candidate)];
        while let Some((chain_id, block)) = pending.pop() {
            hazards.visit(provider, linker, tier, chain_id, block, &mut pending)?;
        }

        debug!(
            target: "supervisor::safety_checker",
            chain_id,
            %candidate,
            hazards = hazards.len(),
            "Built hazard set"
        );
        Ok(hazards)
    }

    /// Creates a hazard set from known entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (ChainId, BlockSeal)>) -> Self {
        Self { entries: entries.into_iter().collect() }
    }

    /// Returns the hazards in ascending order of chain ID.
    pub fn entries(&self) -> impl Iterator<Item = (ChainId, BlockSeal)> + '_ {
        self.entries.iter().map(|(chain_id, block)| (*chain_id, *block))
    }

    /// Returns the hazard block of the given chain.
    pub fn get(&self, chain_id: ChainId) -> Option<&BlockSeal> {
        self.entries.get(&chain_id)
    }

    /// Returns the number of hazard blocks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no hazard blocks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn visit<P, L>(
        &mut self,
        provider: &P,
        linker: &L,
        tier: HazardTier,
        chain_id: ChainId,
        block: BlockSeal,
        pending: &mut Vec<(ChainId, BlockSeal)>,
    ) -> Result<(), CrossSafetyError>
    where
        P: CrossChainSafetyProvider + ?Sized,
        L: LinkChecker + ?Sized,
    {
        trace!(
            target: "supervisor::safety_checker",
            chain_id,
            %block,
            "Processing block for hazards"
        );

        let opened = provider.open_block(chain_id, block.number)?;
        if opened.block.id() != block.id() {
            return Err(ValidationError::BlockMismatch {
                chain_id,
                expected: block.id(),
                found: opened.block.id(),
            }
            .into());
        }

        // Check every link is allowed before looking up any initiating message.
        for (log_index, msg) in &opened.executing_messages {
            if !linker.can_execute(chain_id, block.timestamp, msg.chain_id, msg.timestamp) {
                return Err(ValidationError::MessageNotExecutable {
                    chain_id,
                    block: block.id(),
                    log_index: *log_index,
                    initiating_chain_id: msg.chain_id,
                    initiating_timestamp: msg.timestamp,
                }
                .into());
            }
        }

        for msg in opened.executing_messages.values() {
            let included_in = provider.contains(msg.chain_id, ContainsQuery::from(msg))?;

            match msg.timestamp.cmp(&block.timestamp) {
                Ordering::Less => {
                    tier.is_cross_valid_block(provider, msg.chain_id, included_in.id())?;
                }
                Ordering::Equal => match self.entries.entry(msg.chain_id) {
                    Entry::Occupied(existing) => {
                        if existing.get().id() != included_in.id() {
                            return Err(ValidationError::ConflictingDependency {
                                chain_id: msg.chain_id,
                                existing: existing.get().id(),
                                incoming: included_in.id(),
                            }
                            .into());
                        }
                    }
                    Entry::Vacant(entry) => {
                        trace!(
                            target: "supervisor::safety_checker",
                            chain_id = msg.chain_id,
                            block = %included_in,
                            "Adding block to the hazard set"
                        );
                        entry.insert(included_in);
                        pending.push((msg.chain_id, included_in));
                    }
                },
                Ordering::Greater => {
                    return Err(ValidationError::TimestampInvariantViolation {
                        executing_timestamp: block.timestamp,
                        initiating_timestamp: msg.timestamp,
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}
