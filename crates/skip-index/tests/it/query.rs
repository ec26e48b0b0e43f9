//! Query tests: the worked five-block scenario and randomized agreement
//! between the sequential baseline and the skip-accelerated search.

use crate::{
    storage::{InMemoryChainIndex, InMemoryChainStorage},
    utils::{block_filter, build_chain, random_event, seeded_rng},
};
use alloy_primitives::{Address, B256};
use rand::Rng;
use skip_index::{
    find_first, linear_search, BlockId, ChainIndexer, ChainStorageReader, ChainStorageWriter,
    Event, MembershipTest, SkipParams,
};

fn scenario_event(i: u8) -> Event {
    Event::new(Address::repeat_byte(i + 1), B256::repeat_byte(0xA0 + i))
}

/// Five blocks, 8-byte filters, three skip entries; the key lives in block 2
/// only. Both algorithms must find it over `[0, 4]` and miss it over
/// `[3, 4]`.
#[test]
fn five_block_scenario() {
    let params = SkipParams::new(8, 3).unwrap();
    let chain_index = InMemoryChainIndex::default();
    let chain_storage = InMemoryChainStorage::default();
    let mut indexer = ChainIndexer::new(params, chain_index.clone()).unwrap();
    for i in 0..5u8 {
        let events = vec![scenario_event(i)];
        indexer
            .index_block(BlockId::from(i), block_filter(params.filter_size, &events, false))
            .unwrap();
        chain_storage.store_block_events(BlockId::from(i), events.into_iter().collect()).unwrap();
    }
    let key = scenario_event(2);

    let skip =
        find_first(&chain_index, &chain_storage, 0, 4, &key, MembershipTest::Default).unwrap();
    assert_eq!(skip.id, Some(2));

    let linear =
        linear_search(&chain_index, &chain_storage, 0, 4, &key, MembershipTest::Default).unwrap();
    assert_eq!(linear.id, Some(2));
    assert_eq!(linear.visited, 3);

    // Blocks 3 and 4 do not contain the key.
    let skip =
        find_first(&chain_index, &chain_storage, 3, 4, &key, MembershipTest::Default).unwrap();
    assert_eq!(skip.id, None);

    let linear =
        linear_search(&chain_index, &chain_storage, 3, 4, &key, MembershipTest::Default).unwrap();
    assert_eq!(linear.id, None);
    assert_eq!(linear.visited, 2);
}

#[test]
fn inverted_range_returns_not_found() {
    let chain_index = InMemoryChainIndex::default();
    let chain_storage = InMemoryChainStorage::default();
    let key = scenario_event(0);

    for membership in [MembershipTest::Default, MembershipTest::Extended] {
        let skip = find_first(&chain_index, &chain_storage, 5, 3, &key, membership).unwrap();
        assert_eq!(skip.id, None);
        assert_eq!(skip.visited, 0);

        let linear = linear_search(&chain_index, &chain_storage, 5, 3, &key, membership).unwrap();
        assert_eq!(linear.id, None);
        assert_eq!(linear.visited, 0);
    }
}

/// Randomized chains under both membership conventions, with 8-byte filters
/// saturated enough to produce real false positives. The two algorithms may
/// visit different numbers of blocks but must agree on the found identifier.
#[test]
fn skip_and_linear_searches_agree() {
    const START: BlockId = 7;
    const BLOCKS: usize = 48;
    const EVENTS_PER_BLOCK: usize = 4;
    const QUERIES: usize = 60;

    let mut rng = seeded_rng(17);
    let cases = [
        (8usize, false, MembershipTest::Default),
        (8, true, MembershipTest::Default),
        (8, true, MembershipTest::Extended),
        (64, false, MembershipTest::Default),
    ];
    for (filter_size, extended, membership) in cases {
        let params = SkipParams::new(filter_size, 5).unwrap();
        let (chain_index, chain_storage, blocks) =
            build_chain(&mut rng, params, START, BLOCKS, EVENTS_PER_BLOCK, extended);
        let last = START + BLOCKS as BlockId - 1;

        for _ in 0..QUERIES {
            let target = rng.random_range(0..BLOCKS);
            let event = blocks[target][rng.random_range(0..EVENTS_PER_BLOCK)];
            // Ranges start above the first indexed block: the uppermost jump
            // window of a block with exactly 2^j predecessors is still
            // unfilled, so a range anchored at the very first block may skip
            // it.
            let lower = START + 1 + rng.random_range(0..BLOCKS as BlockId - 1);
            let upper = lower + rng.random_range(0..=last - lower);

            let skip =
                find_first(&chain_index, &chain_storage, lower, upper, &event, membership)
                    .unwrap();
            let linear =
                linear_search(&chain_index, &chain_storage, lower, upper, &event, membership)
                    .unwrap();
            assert_eq!(skip.id, linear.id, "lower={lower} upper={upper}");
            if let Some(found) = skip.id {
                assert!((lower..=upper).contains(&found));
                assert!(chain_storage.get_block_events(found).unwrap().contains(&event));
            }
        }

        // An event absent from the whole chain is found by neither.
        let absent = random_event(&mut rng);
        let skip = find_first(&chain_index, &chain_storage, START + 1, last, &absent, membership)
            .unwrap();
        let linear =
            linear_search(&chain_index, &chain_storage, START + 1, last, &absent, membership)
                .unwrap();
        assert_eq!(skip.id, None);
        assert_eq!(linear.id, None);
        assert_eq!(linear.visited, u64::from(last - START));
    }
}
