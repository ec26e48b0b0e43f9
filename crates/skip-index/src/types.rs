//! Core types shared across the skip index implementation.

/// Identifier of a block in the chain.
///
/// Block identifiers are contiguous integers assigned in chain order. They are
/// distinct from the block *height* (the zero-based position in the indexed
/// sequence): identifiers may start at an arbitrary offset, heights always
/// start at zero.
pub type BlockId = u32;

/// Errors that can occur when building or querying skip indexes.
#[derive(Debug, thiserror::Error)]
pub enum SkipError {
    /// Filter size is not a positive multiple of 8 bytes.
    #[error("invalid filter size: {0} (must be a positive multiple of 8 bytes)")]
    InvalidSize(usize),

    /// Two filters with different sizes were merged or compared.
    #[error("filter size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// The size required by the receiving filter.
        expected: usize,
        /// The size actually supplied.
        actual: usize,
    },

    /// A skip index entry was requested outside the valid range.
    #[error("skip entry {index} out of range (index has {len} entries)")]
    IndexOutOfRange {
        /// The requested entry.
        index: usize,
        /// The number of entries in the index.
        len: usize,
    },

    /// Serialized data does not match its declared layout.
    #[error("malformed data: {0}")]
    MalformedData(String),

    /// A requested block identifier is absent from a store.
    #[error("block {0} not found")]
    NotFound(BlockId),

    /// A block was submitted for indexing out of sequence.
    #[error("invalid block sequence: expected {expected}, got {actual}")]
    InvalidBlockSequence {
        /// The block identifier the indexer expected next.
        expected: BlockId,
        /// The block identifier actually submitted.
        actual: BlockId,
    },

    /// I/O error while reading or writing a filter file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for skip index operations.
pub type SkipResult<T> = Result<T, SkipError>;

/// Outcome of a first-occurrence query.
///
/// `id` is `None` when no block in the queried range contains the event.
/// `visited` counts the block indices examined and is used for performance
/// accounting only; it carries no correctness meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Identifier of the block containing the first occurrence, if any.
    pub id: Option<BlockId>,
    /// Number of block indices visited while answering the query.
    pub visited: u64,
}
