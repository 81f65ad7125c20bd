//! Fixed-size chunking.

use std::num::NonZeroUsize;

/// Split `items` into consecutive chunks of `chunk_size`. The last chunk may
/// be shorter; an empty slice yields no chunks.
pub fn split<T>(items: &[T], chunk_size: NonZeroUsize) -> std::slice::Chunks<'_, T> {
    items.chunks(chunk_size.get())
}
