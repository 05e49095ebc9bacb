use kona_supervisor_types::{BlockSeal, DerivedRefPair};

/// Represents chain events that are emitted by the cross-chain safety checker.
///
/// Each event carries the block that changed, so that consumers can update their view of the
/// chain without querying storage.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ChainEvent {
    /// A cross unsafe update event, indicating that a cross unsafe block has been promoted.
    CrossUnsafeUpdate {
        /// The [`BlockSeal`] of the new cross unsafe block
        block: BlockSeal,
    },

    /// A cross safe update event, indicating that a cross safe block has been promoted.
    ///
    /// Also emitted when the source scope of the current cross safe block is extended.
    CrossSafeUpdate {
        /// The [`DerivedRefPair`] containing the derived block and its source block.
        derived_ref_pair: DerivedRefPair,
    },

    /// A local safe block could not be promoted to cross safe and has been invalidated.
    LocalSafeInvalidated {
        /// The [`DerivedRefPair`] of the invalidated candidate.
        candidate: DerivedRefPair,
    },
}
