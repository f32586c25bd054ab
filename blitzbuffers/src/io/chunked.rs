use {
    super::BufferBuilder,
    crate::{
        error::{allocation_failure, offset_overflow, Result},
        offset::MAX_BUFFER_SIZE,
    },
    alloc::vec::Vec,
    core::{iter, mem},
};

/// Chunk size used by [`ChunkedBufferBuilder::default`].
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

#[derive(Debug)]
struct Chunk {
    bytes: Vec<u8>,
    /// Logical offset of the first byte.
    start: usize,
    used: usize,
}

impl Chunk {
    const EMPTY: Self = Self {
        bytes: Vec::new(),
        start: 0,
        used: 0,
    };

    fn zeroed(capacity: usize, start: usize) -> Result<Self> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(capacity)
            .map_err(|_| allocation_failure(capacity))?;
        bytes.resize(capacity, 0);
        Ok(Self {
            bytes,
            start,
            used: 0,
        })
    }

    #[inline]
    fn free(&self) -> usize {
        self.bytes.len() - self.used
    }

    #[inline]
    fn used_bytes(&self) -> &[u8] {
        &self.bytes[..self.used]
    }
}

/// Builder that grows by allocating new chunks.
///
/// When the current chunk cannot hold a reservation it is retired into the chunk
/// history, untouched, and a new zeroed chunk of at least the default chunk size is
/// allocated. Written bytes never move until [`finalize`](BufferBuilder::finalize),
/// which copies the chunks into one contiguous buffer only if more than one chunk
/// was used.
///
/// The first chunk is allocated by the first reservation, so construction and
/// [`clear`](BufferBuilder::clear) never allocate.
///
/// # Examples
///
/// ```
/// # use blitzbuffers::{BufferBuilder, ChunkedBufferBuilder};
/// let mut builder = ChunkedBufferBuilder::new(4);
/// builder.reserve(3).unwrap().1.copy_from_slice(b"abc");
/// builder.reserve(3).unwrap().1.copy_from_slice(b"def");
/// assert_eq!(builder.chunk_count(), 2);
/// assert_eq!(builder.finalize().unwrap(), b"abcdef");
/// ```
#[derive(Debug)]
pub struct ChunkedBufferBuilder {
    current: Chunk,
    /// Retired chunks, oldest first.
    history: Vec<Chunk>,
    size: usize,
    default_chunk_size: usize,
    /// Contiguous copy produced by the last multi-chunk finalize.
    defragmented: Vec<u8>,
}

impl Default for ChunkedBufferBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ChunkedBufferBuilder {
    pub const fn new(default_chunk_size: usize) -> Self {
        Self {
            current: Chunk::EMPTY,
            history: Vec::new(),
            size: 0,
            default_chunk_size,
            defragmented: Vec::new(),
        }
    }

    #[inline]
    pub fn default_chunk_size(&self) -> usize {
        self.default_chunk_size
    }

    /// Number of chunks holding written bytes.
    pub fn chunk_count(&self) -> usize {
        self.history.len() + usize::from(self.current.used > 0)
    }

    fn ensure_capacity(&mut self, size: usize) -> Result<()> {
        if self.current.free() >= size {
            return Ok(());
        }
        let chunk = Chunk::zeroed(size.max(self.default_chunk_size), self.size)?;
        let retired = mem::replace(&mut self.current, chunk);
        if retired.used > 0 {
            self.history.push(retired);
        }
        Ok(())
    }

    /// Index into the history of the chunk holding `offset`, or `None` for the
    /// current chunk.
    #[inline]
    fn locate(&self, offset: usize) -> Option<usize> {
        if offset >= self.current.start {
            return None;
        }
        Some(
            self.history
                .partition_point(|chunk| chunk.start <= offset)
                .saturating_sub(1),
        )
    }
}

impl BufferBuilder for ChunkedBufferBuilder {
    fn reserve(&mut self, size: usize) -> Result<(usize, &mut [u8])> {
        let offset = self.size;
        let end = match offset.checked_add(size) {
            Some(end) if end <= MAX_BUFFER_SIZE => end,
            _ => return Err(offset_overflow(offset.saturating_add(size))),
        };
        self.ensure_capacity(size)?;
        let local = self.current.used;
        self.current.used += size;
        self.size = end;
        Ok((offset, &mut self.current.bytes[local..local + size]))
    }

    fn span(&self, offset: usize, len: usize) -> &[u8] {
        let chunk = match self.locate(offset) {
            Some(index) => &self.history[index],
            None => &self.current,
        };
        let local = offset - chunk.start;
        debug_assert!(local + len <= chunk.used);
        &chunk.bytes[local..local + len]
    }

    fn span_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        let chunk = match self.locate(offset) {
            Some(index) => &mut self.history[index],
            None => &mut self.current,
        };
        let local = offset - chunk.start;
        debug_assert!(local + len <= chunk.used);
        &mut chunk.bytes[local..local + len]
    }

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    fn clear(&mut self) {
        self.current = Chunk::EMPTY;
        self.history = Vec::new();
        self.defragmented = Vec::new();
        self.size = 0;
    }

    fn finalize(&mut self) -> Result<&[u8]> {
        if self.history.is_empty() {
            return Ok(self.current.used_bytes());
        }
        let mut out = Vec::new();
        out.try_reserve_exact(self.size)
            .map_err(|_| allocation_failure(self.size))?;
        for chunk in self.history.iter().chain(iter::once(&self.current)) {
            out.extend_from_slice(chunk.used_bytes());
        }
        debug_assert_eq!(out.len(), self.size);
        self.defragmented = out;
        Ok(&self.defragmented)
    }
}
