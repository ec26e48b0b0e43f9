//! Shared fixtures for building randomized test chains.

use crate::storage::{InMemoryChainIndex, InMemoryChainStorage};
use alloy_primitives::{Address, B256};
use rand::{rngs::StdRng, Rng, SeedableRng};
use skip_index::{BlockId, BloomFilter, ChainIndexer, ChainStorageWriter, Event, SkipParams};

pub(crate) fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub(crate) fn random_event(rng: &mut StdRng) -> Event {
    Event::new(Address::from(rng.random::<[u8; 20]>()), B256::from(rng.random::<[u8; 32]>()))
}

/// Builds a block's own filter from its events.
///
/// Addresses and signatures are always inserted individually; extended
/// filters additionally insert the address-signature concatenation so they
/// answer the extended membership convention too.
pub(crate) fn block_filter(filter_size: usize, events: &[Event], extended: bool) -> BloomFilter {
    let mut filter = BloomFilter::new(filter_size).unwrap();
    for event in events {
        filter.insert(event.address.as_slice());
        filter.insert(event.signature.as_slice());
        if extended {
            filter.insert(&event.combined());
        }
    }
    filter
}

/// Indexes a chain of `num_blocks` blocks with contiguous identifiers
/// starting at `start_block`, each holding `events_per_block` random events.
///
/// Returns the populated stores and the events of each block in height
/// order.
pub(crate) fn build_chain(
    rng: &mut StdRng,
    params: SkipParams,
    start_block: BlockId,
    num_blocks: usize,
    events_per_block: usize,
    extended: bool,
) -> (InMemoryChainIndex, InMemoryChainStorage, Vec<Vec<Event>>) {
    let chain_index = InMemoryChainIndex::default();
    let chain_storage = InMemoryChainStorage::default();
    let mut indexer = ChainIndexer::new(params, chain_index.clone()).unwrap();

    let mut blocks = Vec::with_capacity(num_blocks);
    for offset in 0..num_blocks {
        let block_id = start_block + offset as BlockId;
        let events: Vec<Event> = (0..events_per_block).map(|_| random_event(rng)).collect();
        indexer
            .index_block(block_id, block_filter(params.filter_size, &events, extended))
            .unwrap();
        chain_storage.store_block_events(block_id, events.iter().copied().collect()).unwrap();
        blocks.push(events);
    }

    (chain_index, chain_storage, blocks)
}
