//! Fixed-size batching of row tuples

/// Default number of rows per multi-row insert
pub const DEFAULT_BATCH_SIZE: usize = 5000;

/// Split `items` into contiguous batches of `size`; the last may be shorter.
///
/// Lazy and restartable by calling again. A `size` of zero is treated as one.
pub fn chunk<T>(items: &[T], size: usize) -> std::slice::Chunks<'_, T> {
    items.chunks(size.max(1))
}

/// Number of batches [`chunk`] yields for `len` items
pub fn batch_count(len: usize, size: usize) -> usize {
    len.div_ceil(size.max(1))
}
