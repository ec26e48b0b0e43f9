//! Reader and writer for precomputed filter files.
//!
//! A filter file carries one Bloom filter per block, produced by the batch
//! filter builders and consumed by chain index construction. The layout is a
//! 4-byte big-endian filter size followed by repeated records of a 4-byte
//! big-endian block identifier and the filter's raw bytes:
//!
//! ```text
//! i32 filter_size | (i32 block_id | filter_size bytes)*
//! ```

use crate::{
    bloom::BloomFilter,
    types::{BlockId, SkipError, SkipResult},
};
use std::io::{ErrorKind, Read, Write};

/// Streaming reader over a filter file.
#[derive(Debug)]
pub struct FilterFileReader<R> {
    inner: R,
    filter_size: usize,
}

impl<R: Read> FilterFileReader<R> {
    /// Wraps a byte source, reading and validating the size header.
    pub fn new(mut inner: R) -> SkipResult<Self> {
        let mut header = [0u8; 4];
        inner.read_exact(&mut header)?;
        let declared = i32::from_be_bytes(header);
        let Ok(filter_size) = usize::try_from(declared) else {
            return Err(SkipError::MalformedData(format!(
                "negative filter size in header: {declared}"
            )));
        };
        if filter_size == 0 || filter_size % 8 != 0 {
            return Err(SkipError::InvalidSize(filter_size));
        }
        Ok(Self { inner, filter_size })
    }

    /// Returns the filter size declared by the file header.
    pub const fn filter_size(&self) -> usize {
        self.filter_size
    }

    /// Reads the next `(block identifier, filter)` record.
    ///
    /// Returns `Ok(None)` at a clean end of file. A record cut short mid-way
    /// is [`SkipError::MalformedData`], never silently dropped.
    pub fn read_filter(&mut self) -> SkipResult<Option<(BlockId, BloomFilter)>> {
        let mut id_bytes = [0u8; 4];
        let read = read_full(&mut self.inner, &mut id_bytes)?;
        if read == 0 {
            return Ok(None);
        }
        if read < id_bytes.len() {
            return Err(SkipError::MalformedData(format!(
                "truncated block identifier: {read} of 4 bytes"
            )));
        }
        let block_id = BlockId::from_be_bytes(id_bytes);

        let mut filter_bytes = vec![0u8; self.filter_size];
        self.inner.read_exact(&mut filter_bytes).map_err(|err| {
            if err.kind() == ErrorKind::UnexpectedEof {
                SkipError::MalformedData(format!("truncated filter record for block {block_id}"))
            } else {
                SkipError::Io(err)
            }
        })?;
        Ok(Some((block_id, BloomFilter::from_bytes(&filter_bytes)?)))
    }
}

impl<R: Read> Iterator for FilterFileReader<R> {
    type Item = SkipResult<(BlockId, BloomFilter)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_filter().transpose()
    }
}

/// Streaming writer producing the filter file layout.
#[derive(Debug)]
pub struct FilterFileWriter<W> {
    inner: W,
    filter_size: usize,
}

impl<W: Write> FilterFileWriter<W> {
    /// Wraps a byte sink and writes the size header.
    pub fn new(mut inner: W, filter_size: usize) -> SkipResult<Self> {
        if filter_size == 0 || filter_size % 8 != 0 {
            return Err(SkipError::InvalidSize(filter_size));
        }
        inner.write_all(&(filter_size as i32).to_be_bytes())?;
        Ok(Self { inner, filter_size })
    }

    /// Appends one `(block identifier, filter)` record.
    pub fn write_filter(&mut self, block_id: BlockId, filter: &BloomFilter) -> SkipResult<()> {
        if filter.size() != self.filter_size {
            return Err(SkipError::SizeMismatch {
                expected: self.filter_size,
                actual: filter.size(),
            });
        }
        self.inner.write_all(&block_id.to_be_bytes())?;
        self.inner.write_all(&filter.to_bytes())?;
        Ok(())
    }

    /// Flushes the underlying sink.
    pub fn flush(&mut self) -> SkipResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Consumes the writer and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Reads until the buffer is full or the source is exhausted, returning the
/// number of bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
