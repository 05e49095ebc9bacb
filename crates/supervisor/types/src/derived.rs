//! Derivation relationships between source (L1) and derived (L2) blocks.

use crate::{BlockRef, BlockSeal};
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};

/// A pair of [`BlockRef`]s representing a derivation relationship between two blocks.
///
/// - `source`: The [`BlockRef`] of the source (L1) block.
/// - `derived`: The [`BlockRef`] of the derived (L2) block.
#[derive(
    Debug, Clone, Copy, Default, Display, Constructor, PartialEq, Eq, Serialize, Deserialize,
)]
#[display("source: {source}, derived: {derived}")]
#[serde(rename_all = "camelCase")]
pub struct DerivedRefPair {
    /// The [`BlockRef`] of the source (L1) block.
    pub source: BlockRef,
    /// The [`BlockRef`] of the derived (L2) block.
    pub derived: BlockRef,
}

/// A pair of [`BlockSeal`]s representing a derivation relationship between two blocks.
#[derive(
    Debug, Clone, Copy, Default, Display, Constructor, PartialEq, Eq, Serialize, Deserialize,
)]
#[display("source: {source}, derived: {derived}")]
#[serde(rename_all = "camelCase")]
pub struct DerivedSealPair {
    /// The [`BlockSeal`] of the source (L1) block.
    pub source: BlockSeal,
    /// The [`BlockSeal`] of the derived (L2) block.
    pub derived: BlockSeal,
}

impl From<DerivedRefPair> for DerivedSealPair {
    fn from(pair: DerivedRefPair) -> Self {
        Self { source: pair.source.into(), derived: pair.derived.into() }
    }
}
