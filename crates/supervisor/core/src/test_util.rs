//! Test utilities for `kona-supervisor-core`.

#![allow(missing_docs, unreachable_pub, unused)]

use crate::safety_checker::LinkChecker;
use alloy_eips::BlockNumHash;
use alloy_primitives::{B256, ChainId};
use kona_supervisor_storage::{CrossChainSafetyProvider, StorageError};
use kona_supervisor_types::{
    BlockRef, BlockSeal, ContainsQuery, DerivedRefPair, DerivedSealPair, ExecutingMessage,
    OpenedBlock,
};
use mockall::mock;
use std::{
    collections::BTreeMap,
    sync::{Mutex, PoisonError},
};

mock! (
    #[derive(Debug)]
    pub Provider {}

    impl CrossChainSafetyProvider for Provider {
        fn open_block(&self, chain_id: ChainId, block_number: u64) -> Result<OpenedBlock, StorageError>;
        fn contains(&self, chain_id: ChainId, query: ContainsQuery) -> Result<BlockSeal, StorageError>;
        fn find_block_id(&self, chain_id: ChainId, block_number: u64) -> Result<BlockNumHash, StorageError>;
        fn is_cross_unsafe(&self, chain_id: ChainId, block: BlockNumHash) -> Result<(), StorageError>;
        fn is_local_unsafe(&self, chain_id: ChainId, block: BlockNumHash) -> Result<(), StorageError>;
        fn cross_unsafe(&self, chain_id: ChainId) -> Result<BlockSeal, StorageError>;
        fn cross_safe(&self, chain_id: ChainId) -> Result<DerivedSealPair, StorageError>;
        fn cross_derived_to_source(&self, chain_id: ChainId, derived: BlockNumHash) -> Result<BlockSeal, StorageError>;
        fn candidate_cross_safe(&self, chain_id: ChainId) -> Result<DerivedRefPair, StorageError>;
        fn next_source(&self, chain_id: ChainId, source: BlockNumHash) -> Result<BlockRef, StorageError>;
        fn previous_cross_derived(&self, chain_id: ChainId, derived: BlockNumHash) -> Result<BlockSeal, StorageError>;
        fn update_cross_unsafe(&self, chain_id: ChainId, block: BlockSeal) -> Result<(), StorageError>;
        fn update_cross_safe(&self, chain_id: ChainId, source: BlockRef, derived: BlockRef) -> Result<(), StorageError>;
        fn invalidate_local_safe(&self, chain_id: ChainId, candidate: DerivedRefPair) -> Result<(), StorageError>;
    }
);

mock! (
    #[derive(Debug)]
    pub Linker {}

    impl LinkChecker for Linker {
        fn can_execute(
            &self,
            executing_chain_id: ChainId,
            executing_timestamp: u64,
            initiating_chain_id: ChainId,
            initiating_timestamp: u64,
        ) -> bool;
    }
);

/// A [`LinkChecker`] allowing every link.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl LinkChecker for AllowAll {
    fn can_execute(&self, _: ChainId, _: u64, _: ChainId, _: u64) -> bool {
        true
    }
}

/// Generic 32 byte hash derived from `n`.
pub fn b256(n: u64) -> B256 {
    let mut bytes = [0u8; 32];
    bytes[24..].copy_from_slice(&n.to_be_bytes());
    B256::from(bytes)
}

/// Hash of block `number` on `chain_id`.
pub fn block_hash(chain_id: ChainId, number: u64) -> B256 {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&chain_id.to_be_bytes());
    bytes[24..].copy_from_slice(&number.to_be_bytes());
    B256::from(bytes)
}

/// Checksum of log `log_index` in block `number` on `chain_id`.
pub fn log_checksum(chain_id: ChainId, number: u64, log_index: u32) -> B256 {
    let mut bytes = [0xffu8; 32];
    bytes[..8].copy_from_slice(&chain_id.to_be_bytes());
    bytes[8..16].copy_from_slice(&number.to_be_bytes());
    bytes[16..20].copy_from_slice(&log_index.to_be_bytes());
    B256::from(bytes)
}

/// Seal of source block `number`.
pub fn source_seal(number: u64) -> BlockSeal {
    let mut bytes = [0xaau8; 32];
    bytes[24..].copy_from_slice(&number.to_be_bytes());
    BlockSeal::new(B256::from(bytes), number, number * 12)
}

/// Reference of source block `number`.
pub fn source_ref(number: u64) -> BlockRef {
    let parent = if number == 0 { B256::ZERO } else { source_seal(number - 1).hash };
    source_seal(number).with_parent(parent)
}

/// Executing message referencing log `log_index` of block `number` on `chain_id`.
pub fn exec_msg(
    chain_id: ChainId,
    number: u64,
    log_index: u32,
    timestamp: u64,
) -> ExecutingMessage {
    ExecutingMessage {
        chain_id,
        block_number: number,
        log_index,
        timestamp,
        checksum: log_checksum(chain_id, number, log_index),
    }
}

#[derive(Debug, Default)]
pub struct ChainBuilder {
    chain_id: ChainId,
    blocks: BTreeMap<u64, OpenedBlock>,
    cross_unsafe: Option<u64>,
    cross_derived: BTreeMap<u64, BlockSeal>,
    candidate: Option<DerivedRefPair>,
    invalidated: Vec<DerivedRefPair>,
}

impl ChainBuilder {
    /// Adds block `number` with the given timestamp and number of logs.
    pub fn block(&mut self, number: u64, timestamp: u64, log_count: u32) -> &mut Self {
        let parent_hash =
            if number == 0 { B256::ZERO } else { block_hash(self.chain_id, number - 1) };
        let hash = block_hash(self.chain_id, number);
        let block = BlockRef::new(hash, number, parent_hash, timestamp);
        self.blocks.insert(number, OpenedBlock { block, log_count, ..Default::default() });
        self
    }

    /// Adds an executing message at `log_index` of block `number`.
    pub fn message(&mut self, number: u64, log_index: u32, msg: ExecutingMessage) -> &mut Self {
        self.blocks
            .get_mut(&number)
            .expect("block must be added before its messages")
            .executing_messages
            .insert(log_index, msg);
        self
    }

    pub fn cross_unsafe(&mut self, number: u64) -> &mut Self {
        self.cross_unsafe = Some(number);
        self
    }

    /// Marks block `derived` as cross-derived from source block `source`.
    pub fn cross_derived(&mut self, derived: u64, source: u64) -> &mut Self {
        self.cross_derived.insert(derived, source_seal(source));
        self
    }

    /// Sets the local-safe candidate, derived from source block `source`.
    pub fn candidate(&mut self, derived: u64, source: u64) -> &mut Self {
        let derived = self.blocks.get(&derived).expect("candidate block must exist").block;
        self.candidate = Some(DerivedRefPair::new(source_ref(source), derived));
        self
    }

    fn seal(&self, number: u64) -> Option<BlockSeal> {
        self.blocks.get(&number).map(|opened| opened.block.into())
    }

    fn check_id(&self, id: BlockNumHash) -> Result<(), StorageError> {
        match self.seal(id.number) {
            Some(seal) if seal.hash == id.hash => Ok(()),
            Some(_) => Err(StorageError::ConflictError),
            None => Err(StorageError::FutureData),
        }
    }
}

#[derive(Debug, Default)]
pub struct StorageBuilder {
    chains: BTreeMap<ChainId, ChainBuilder>,
}

impl StorageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain(&mut self, chain_id: ChainId) -> &mut ChainBuilder {
        self.chains
            .entry(chain_id)
            .or_insert_with(|| ChainBuilder { chain_id, ..Default::default() })
    }

    pub fn build(self) -> InMemoryStorage {
        InMemoryStorage { chains: Mutex::new(self.chains) }
    }
}

/// Simple in-memory [`CrossChainSafetyProvider`] for multi-chain scenarios.
#[derive(Debug)]
pub struct InMemoryStorage {
    chains: Mutex<BTreeMap<ChainId, ChainBuilder>>,
}

impl InMemoryStorage {
    fn with_chain<T>(
        &self,
        chain_id: ChainId,
        f: impl FnOnce(&mut ChainBuilder) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut chains = self.chains.lock().unwrap_or_else(PoisonError::into_inner);
        let chain = chains.get_mut(&chain_id).ok_or(StorageError::UnknownChain(chain_id))?;
        f(chain)
    }

    pub fn seal(&self, chain_id: ChainId, number: u64) -> BlockSeal {
        self.with_chain(chain_id, |chain| chain.seal(number).ok_or(StorageError::FutureData))
            .expect("block must exist")
    }

    pub fn cross_unsafe_head(&self, chain_id: ChainId) -> Option<u64> {
        self.with_chain(chain_id, |chain| Ok(chain.cross_unsafe)).ok().flatten()
    }

    pub fn invalidated(&self, chain_id: ChainId) -> Vec<DerivedRefPair> {
        self.with_chain(chain_id, |chain| Ok(chain.invalidated.clone())).unwrap_or_default()
    }
}

impl CrossChainSafetyProvider for InMemoryStorage {
    fn open_block(
        &self,
        chain_id: ChainId,
        block_number: u64,
    ) -> Result<OpenedBlock, StorageError> {
        self.with_chain(chain_id, |chain| {
            chain.blocks.get(&block_number).cloned().ok_or(StorageError::FutureData)
        })
    }

    fn contains(&self, chain_id: ChainId, query: ContainsQuery) -> Result<BlockSeal, StorageError> {
        self.with_chain(chain_id, |chain| {
            let opened = chain.blocks.get(&query.block_number).ok_or(StorageError::FutureData)?;
            if opened.block.timestamp != query.timestamp ||
                query.log_index >= opened.log_count ||
                query.checksum != log_checksum(chain_id, query.block_number, query.log_index)
            {
                return Err(StorageError::ConflictError);
            }
            Ok(opened.block.into())
        })
    }

    fn find_block_id(
        &self,
        chain_id: ChainId,
        block_number: u64,
    ) -> Result<BlockNumHash, StorageError> {
        self.with_chain(chain_id, |chain| {
            chain.seal(block_number).map(|seal| seal.id()).ok_or(StorageError::FutureData)
        })
    }

    fn is_cross_unsafe(&self, chain_id: ChainId, block: BlockNumHash) -> Result<(), StorageError> {
        self.with_chain(chain_id, |chain| match chain.cross_unsafe {
            Some(head) if block.number <= head => chain.check_id(block),
            _ => Err(StorageError::FutureData),
        })
    }

    fn is_local_unsafe(&self, chain_id: ChainId, block: BlockNumHash) -> Result<(), StorageError> {
        self.with_chain(chain_id, |chain| chain.check_id(block))
    }

    fn cross_unsafe(&self, chain_id: ChainId) -> Result<BlockSeal, StorageError> {
        self.with_chain(chain_id, |chain| {
            chain.cross_unsafe.and_then(|head| chain.seal(head)).ok_or(StorageError::FutureData)
        })
    }

    fn cross_safe(&self, chain_id: ChainId) -> Result<DerivedSealPair, StorageError> {
        self.with_chain(chain_id, |chain| {
            let (derived, source) =
                chain.cross_derived.last_key_value().ok_or(StorageError::FutureData)?;
            let derived = chain.seal(*derived).ok_or(StorageError::FutureData)?;
            Ok(DerivedSealPair::new(*source, derived))
        })
    }

    fn cross_derived_to_source(
        &self,
        chain_id: ChainId,
        derived: BlockNumHash,
    ) -> Result<BlockSeal, StorageError> {
        self.with_chain(chain_id, |chain| {
            let source = chain.cross_derived.get(&derived.number).ok_or(StorageError::FutureData)?;
            chain.check_id(derived)?;
            Ok(*source)
        })
    }

    fn candidate_cross_safe(&self, chain_id: ChainId) -> Result<DerivedRefPair, StorageError> {
        self.with_chain(chain_id, |chain| chain.candidate.ok_or(StorageError::FutureData))
    }

    fn next_source(
        &self,
        chain_id: ChainId,
        source: BlockNumHash,
    ) -> Result<BlockRef, StorageError> {
        self.with_chain(chain_id, |_| Ok(source_ref(source.number + 1)))
    }

    fn previous_cross_derived(
        &self,
        chain_id: ChainId,
        derived: BlockNumHash,
    ) -> Result<BlockSeal, StorageError> {
        self.with_chain(chain_id, |chain| {
            if derived.number == 0 {
                return Ok(BlockSeal::default());
            }
            chain.seal(derived.number - 1).ok_or(StorageError::FutureData)
        })
    }

    fn update_cross_unsafe(&self, chain_id: ChainId, block: BlockSeal) -> Result<(), StorageError> {
        self.with_chain(chain_id, |chain| {
            chain.check_id(block.id())?;
            chain.cross_unsafe = Some(block.number);
            Ok(())
        })
    }

    fn update_cross_safe(
        &self,
        chain_id: ChainId,
        source: BlockRef,
        derived: BlockRef,
    ) -> Result<(), StorageError> {
        self.with_chain(chain_id, |chain| {
            chain.check_id(derived.id())?;
            chain.cross_derived.insert(derived.number, source.into());
            chain.candidate = None;
            Ok(())
        })
    }

    fn invalidate_local_safe(
        &self,
        chain_id: ChainId,
        candidate: DerivedRefPair,
    ) -> Result<(), StorageError> {
        self.with_chain(chain_id, |chain| {
            chain.invalidated.push(candidate);
            chain.candidate = None;
            Ok(())
        })
    }
}
