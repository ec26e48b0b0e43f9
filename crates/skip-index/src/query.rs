//! First-occurrence search over the chain.
//!
//! Both algorithms answer the same question: the highest-identified block in
//! `[lower, upper]` whose exact event set contains the queried event. Bloom
//! filters are only a pre-filter; every positive is confirmed against the
//! per-block event set, so false positives cost extra work but never produce
//! a wrong answer, and the absence of false negatives means no true hit is
//! ever skipped.

use crate::{
    bloom::BloomFilter,
    event::Event,
    storage::{ChainIndexReader, ChainStorageReader},
    types::{BlockId, QueryResult, SkipResult},
};
use tracing::debug;

/// Convention for testing an event against a Bloom filter.
///
/// The test must match the convention the filters were built with: filters
/// populated with individual addresses and topics answer the `Default` test,
/// extended filters additionally populated with address-signature
/// concatenations answer the `Extended` test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MembershipTest {
    /// The event's address and signature must each test positive on their
    /// own.
    #[default]
    Default,
    /// The concatenation of address and signature must test positive as a
    /// single element.
    Extended,
}

impl MembershipTest {
    /// Runs the membership test against a filter.
    pub fn test(&self, filter: &BloomFilter, event: &Event) -> bool {
        match self {
            Self::Default => {
                filter.contains(event.address.as_slice())
                    && filter.contains(event.signature.as_slice())
            }
            Self::Extended => filter.contains(&event.combined()),
        }
    }
}

/// Sequential baseline search.
///
/// Scans from `upper` down to `lower`, testing each block's own filter and
/// confirming positives against the exact event set. Skip entries are never
/// consulted.
pub fn linear_search<I, S>(
    index: &I,
    storage: &S,
    lower: BlockId,
    upper: BlockId,
    event: &Event,
    membership: MembershipTest,
) -> SkipResult<QueryResult>
where
    I: ChainIndexReader + ?Sized,
    S: ChainStorageReader + ?Sized,
{
    let mut result = QueryResult::default();
    let mut i = i64::from(upper);
    while i >= i64::from(lower) {
        let current = index.get_block_index(i as BlockId)?;
        result.visited += 1;
        if membership.test(&current.filter, event)
            && storage.get_block_events(i as BlockId)?.contains(event)
        {
            result.id = Some(i as BlockId);
            break;
        }
        i -= 1;
    }
    debug!(
        target: "skip-index::query",
        lower,
        upper,
        found = ?result.id,
        visited = result.visited,
        "linear search finished"
    );
    Ok(result)
}

/// Skip-accelerated first-occurrence search.
///
/// Visits `upper` first, then uses the block's skip entries to rule out or
/// recurse into the nested backward windows, narrowing `upper` by the
/// largest feasible jump when no window confirms a hit. Worst case degrades
/// to the sequential scan when every window keeps testing positive.
pub fn find_first<I, S>(
    index: &I,
    storage: &S,
    lower: BlockId,
    upper: BlockId,
    event: &Event,
    membership: MembershipTest,
) -> SkipResult<QueryResult>
where
    I: ChainIndexReader + ?Sized,
    S: ChainStorageReader + ?Sized,
{
    let result =
        find_first_range(index, storage, i64::from(lower), i64::from(upper), event, membership)?;
    debug!(
        target: "skip-index::query",
        lower,
        upper,
        found = ?result.id,
        visited = result.visited,
        "skip search finished"
    );
    Ok(result)
}

/// Recursive worker for [`find_first`].
///
/// Bounds are signed so the narrowing step may pass below `lower` (or zero)
/// without wrapping; the loop guard handles the exhausted range.
fn find_first_range<I, S>(
    index: &I,
    storage: &S,
    lower: i64,
    mut upper: i64,
    event: &Event,
    membership: MembershipTest,
) -> SkipResult<QueryResult>
where
    I: ChainIndexReader + ?Sized,
    S: ChainStorageReader + ?Sized,
{
    let mut result = QueryResult::default();
    while upper >= lower {
        let current = index.get_block_index(upper as BlockId)?;
        result.visited += 1;
        if membership.test(&current.filter, event)
            && storage.get_block_events(upper as BlockId)?.contains(event)
        {
            result.id = Some(upper as BlockId);
            return Ok(result);
        }

        let jmax = max_jump(current.skip.num_entries(), lower as BlockId, upper as BlockId);
        if let Some(jmax) = jmax {
            // Windows are scanned smallest-first, most recent blocks first.
            // A negative on a small window does not rule out the larger
            // ones; only a confirmed hit stops the scan.
            for j in 0..=jmax {
                let lsub = lower.max(upper - (1i64 << (j + 1)) + 1);
                let usub = upper - (1i64 << j);
                if membership.test(current.skip.entry(j as usize)?, event) {
                    let partial =
                        find_first_range(index, storage, lsub, usub, event, membership)?;
                    result.visited += partial.visited;
                    if partial.id.is_some() {
                        result.id = partial.id;
                        return Ok(result);
                    }
                }
            }
        }
        upper -= match jmax {
            Some(j) => 1i64 << (j + 1),
            None => 1,
        };
    }
    Ok(result)
}

/// Returns the largest `j` in `[0, num_entries)` such that
/// `lower <= upper - 2^j`, or `None` when even the smallest jump would
/// undershoot the range.
pub fn max_jump(num_entries: usize, lower: BlockId, upper: BlockId) -> Option<u32> {
    let span = i64::from(upper) - i64::from(lower);
    (0..num_entries.min(63) as u32).rev().find(|&j| (1i64 << j) <= span)
}
