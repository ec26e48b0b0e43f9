//! In-memory implementations of the storage collaborator traits.

use skip_index::{
    BlockId, BlockIndex, ChainIndexReader, ChainIndexWriter, ChainStorageReader,
    ChainStorageWriter, EventSet, SkipError, SkipResult,
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// In-memory chain index keyed by block identifier.
///
/// Entries are held in their serialized form so every read and write goes
/// through the persisted byte layout, the way a real key-value backend
/// would.
#[derive(Clone, Default)]
pub(crate) struct InMemoryChainIndex {
    indices: Arc<Mutex<HashMap<BlockId, Vec<u8>>>>,
}

impl ChainIndexReader for InMemoryChainIndex {
    fn get_block_index(&self, block_id: BlockId) -> SkipResult<BlockIndex> {
        let indices = self.indices.lock().unwrap();
        let bytes = indices.get(&block_id).ok_or(SkipError::NotFound(block_id))?;
        BlockIndex::from_bytes(bytes)
    }
}

impl ChainIndexWriter for InMemoryChainIndex {
    fn store_block_index(&self, block_id: BlockId, index: BlockIndex) -> SkipResult<()> {
        self.indices.lock().unwrap().insert(block_id, index.to_bytes());
        Ok(())
    }
}

/// In-memory store of the exact per-block event sets.
#[derive(Clone, Default)]
pub(crate) struct InMemoryChainStorage {
    events: Arc<Mutex<HashMap<BlockId, EventSet>>>,
}

impl ChainStorageReader for InMemoryChainStorage {
    fn get_block_events(&self, block_id: BlockId) -> SkipResult<EventSet> {
        let events = self.events.lock().unwrap();
        events.get(&block_id).cloned().ok_or(SkipError::NotFound(block_id))
    }
}

impl ChainStorageWriter for InMemoryChainStorage {
    fn store_block_events(&self, block_id: BlockId, events: EventSet) -> SkipResult<()> {
        self.events.lock().unwrap().insert(block_id, events);
        Ok(())
    }
}
