use {
    super::BufferBuilder,
    crate::{
        error::{allocation_failure, capacity_exceeded, offset_overflow, Result},
        offset::MAX_BUFFER_SIZE,
    },
    alloc::vec::Vec,
};

/// Builder over a single pre-sized allocation that never grows.
///
/// The storage is either allocated by [`FixedBufferBuilder::new`] or supplied by the
/// caller through [`FixedBufferBuilder::from_buffer`]. A reservation that does not fit
/// in the remaining capacity fails with
/// [`Error::CapacityExceeded`](crate::Error::CapacityExceeded).
///
/// # Examples
///
/// ```
/// # use blitzbuffers::{BufferBuilder, FixedBufferBuilder};
/// let mut storage = [0xffu8; 8];
/// let mut builder = FixedBufferBuilder::from_buffer(&mut storage[..]);
/// let (offset, span) = builder.reserve(4).unwrap();
/// assert_eq!((offset, &*span), (0, &[0u8; 4][..]));
/// assert!(builder.reserve(5).is_err());
/// assert_eq!(builder.finalize().unwrap().len(), 4);
/// ```
#[derive(Debug)]
pub struct FixedBufferBuilder<S = Vec<u8>> {
    storage: S,
    size: usize,
}

impl FixedBufferBuilder {
    /// Allocate `capacity` zeroed bytes.
    pub fn new(capacity: usize) -> Result<Self> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| allocation_failure(capacity))?;
        storage.resize(capacity, 0);
        Ok(Self { storage, size: 0 })
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> FixedBufferBuilder<S> {
    /// Build into caller-supplied storage. The storage is zeroed.
    pub fn from_buffer(mut storage: S) -> Self {
        storage.as_mut().fill(0);
        Self { storage, size: 0 }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.as_ref().len()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.size
    }

    /// Recover the storage. Bytes past [`BufferBuilder::size`] are zero.
    pub fn into_inner(self) -> S {
        self.storage
    }
}

impl<S: AsRef<[u8]> + AsMut<[u8]>> BufferBuilder for FixedBufferBuilder<S> {
    fn reserve(&mut self, size: usize) -> Result<(usize, &mut [u8])> {
        let offset = self.size;
        let capacity = self.capacity();
        let end = match offset.checked_add(size) {
            Some(end) if end <= capacity => end,
            _ => return Err(capacity_exceeded(size, offset, capacity)),
        };
        if end > MAX_BUFFER_SIZE {
            return Err(offset_overflow(end));
        }
        self.size = end;
        Ok((offset, &mut self.storage.as_mut()[offset..end]))
    }

    #[inline]
    fn span(&self, offset: usize, len: usize) -> &[u8] {
        debug_assert!(offset + len <= self.size);
        &self.storage.as_ref()[offset..offset + len]
    }

    #[inline]
    fn span_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        debug_assert!(offset + len <= self.size);
        &mut self.storage.as_mut()[offset..offset + len]
    }

    #[inline]
    fn size(&self) -> usize {
        self.size
    }

    fn clear(&mut self) {
        let size = self.size;
        self.storage.as_mut()[..size].fill(0);
        self.size = 0;
    }

    #[inline]
    fn finalize(&mut self) -> Result<&[u8]> {
        Ok(&self.storage.as_ref()[..self.size])
    }
}
