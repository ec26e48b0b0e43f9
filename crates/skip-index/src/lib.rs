//! Bloom filter skip indexes for first-occurrence queries over block chains.
//!
//! This crate answers "which is the most recent block at or below an upper
//! bound that contains a given event" without scanning full block contents.
//! Each block carries a [`BlockIndex`]: a Bloom filter summarizing its own
//! events plus a [`SkipIndex`], an array of filters where entry `j`
//! summarizes the preceding `2^j` blocks. The skip entries let a backward
//! search rule out exponentially sized windows with a single membership test
//! and jump over them.
//!
//! ## Overview
//!
//! - [`BloomFilter`] — the probabilistic set primitive over byte strings
//! - [`SkipIndex`] / [`BlockIndex`] — the per-block summaries and their
//!   persisted byte layout
//! - [`build_skip_index`] / [`ChainIndexer`] — inductive construction, one
//!   block at a time in chain order
//! - [`linear_search`] / [`find_first`] — the sequential baseline and the
//!   skip-accelerated search, both confirming filter positives against exact
//!   per-block event sets
//! - [`ChainIndexReader`] and friends — the contracts a backing key-value
//!   store has to satisfy
//!
//! ## Usage
//!
//! ```ignore
//! use skip_index::{find_first, ChainIndexer, MembershipTest, SkipParams};
//!
//! let mut indexer = ChainIndexer::new(SkipParams::default(), store)?;
//! for (block_id, filter) in filters {
//!     indexer.index_block(block_id, filter)?;
//! }
//!
//! let result = find_first(&index, &storage, lower, upper, &event, MembershipTest::Default)?;
//! ```
//!
//! Construction must proceed in strictly increasing block order with no
//! gaps; queries are pure reads over immutable data and can run concurrently
//! with each other.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod bloom;
mod builder;
mod event;
mod filter_file;
mod index;
mod params;
mod query;
mod skip;
mod storage;
mod types;

pub use bloom::BloomFilter;
pub use builder::{build_skip_index, ChainIndexer};
pub use event::{Event, EventSet, ADDRESS_LENGTH, TOPIC_LENGTH};
pub use filter_file::{FilterFileReader, FilterFileWriter};
pub use index::BlockIndex;
pub use params::{SkipParams, DEFAULT_PARAMS};
pub use query::{find_first, linear_search, max_jump, MembershipTest};
pub use skip::SkipIndex;
pub use storage::{ChainIndexReader, ChainIndexWriter, ChainStorageReader, ChainStorageWriter};
pub use types::{BlockId, QueryResult, SkipError, SkipResult};
