//! [`BufferBuilder`] implementations.
//!
//! A builder hands out zeroed spans of a logical buffer, addressed by their logical
//! offset from the start of that buffer, and produces one contiguous output buffer on
//! [`BufferBuilder::finalize`]. Logical offsets stay valid while the builder grows, so
//! callers hold offsets, never references into the storage.
use crate::{
    error::{already_inserted, back_reference, interior_terminator, offset_overflow, Result},
    offset::{RelativeOffset, Scalar, OFFSET_SIZE},
};

mod chunked;
mod fixed;
pub use {
    chunked::{ChunkedBufferBuilder, DEFAULT_CHUNK_SIZE},
    fixed::FixedBufferBuilder,
};

/// Byte that ends every string.
pub const TERMINATOR: u8 = 0;

/// Append-only storage for one value graph.
///
/// # Contract
///
/// - Every span returned by [`reserve`](BufferBuilder::reserve) is zeroed and
///   contiguous, and its logical offset equals [`size`](BufferBuilder::size) at the
///   time of the call.
/// - A failed reservation leaves the builder unchanged.
/// - [`span`](BufferBuilder::span) and [`span_mut`](BufferBuilder::span_mut) accept
///   any range that lies within a single earlier reservation.
pub trait BufferBuilder {
    /// Reserve `size` zeroed bytes at the end of the buffer.
    ///
    /// Returns the logical offset of the span and the span itself.
    fn reserve(&mut self, size: usize) -> Result<(usize, &mut [u8])>;

    /// Borrow `len` reserved bytes at logical `offset`.
    ///
    /// # Panics
    ///
    /// If the range was not reserved.
    fn span(&self, offset: usize, len: usize) -> &[u8];

    /// Mutably borrow `len` reserved bytes at logical `offset`.
    ///
    /// # Panics
    ///
    /// If the range was not reserved.
    fn span_mut(&mut self, offset: usize, len: usize) -> &mut [u8];

    /// Logical size of the buffer written so far.
    fn size(&self) -> usize;

    /// Discard everything written, leaving an empty builder ready for reuse.
    fn clear(&mut self);

    /// Produce the contiguous output buffer.
    fn finalize(&mut self) -> Result<&[u8]>;

    #[inline]
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    #[inline]
    fn get<T: Scalar>(&self, offset: usize) -> T {
        T::read_le(self.span(offset, T::SIZE))
    }

    #[inline]
    fn put<T: Scalar>(&mut self, offset: usize, value: T) {
        value.write_le(self.span_mut(offset, T::SIZE))
    }

    /// Fail if the offset field at `field` already references data.
    ///
    /// The field must lie wholly inside the buffer, since whatever it links to is
    /// appended after it.
    #[inline]
    fn ensure_unlinked(&self, field: usize) -> Result<()> {
        let size = self.size();
        if field.checked_add(OFFSET_SIZE).map_or(true, |end| end > size) {
            return Err(back_reference(field, size));
        }
        if self.get::<RelativeOffset>(field).is_absent() {
            Ok(())
        } else {
            Err(already_inserted(field))
        }
    }

    /// Reserve `size` bytes and link them to the offset field at `field`.
    ///
    /// The field must lie before the end of the buffer and must not be linked yet.
    fn reserve_relative(&mut self, size: usize, field: usize) -> Result<(usize, &mut [u8])> {
        let link = RelativeOffset::link(field, self.size())?;
        self.ensure_unlinked(field)?;
        let (offset, _) = self.reserve(size)?;
        debug_assert_eq!(link.resolve(field), Some(offset));
        self.put(field, link);
        Ok((offset, self.span_mut(offset, size)))
    }

    /// Append `bytes` followed by [`TERMINATOR`] and link them to the offset field at
    /// `field`.
    ///
    /// An empty string writes nothing and leaves the field absent.
    fn write_string(&mut self, bytes: &[u8], field: usize) -> Result<RelativeOffset> {
        self.ensure_unlinked(field)?;
        if bytes.is_empty() {
            return Ok(RelativeOffset::Absent);
        }
        if let Some(position) = bytes.iter().position(|&b| b == TERMINATOR) {
            return Err(interior_terminator(position));
        }
        let len = bytes
            .len()
            .checked_add(1)
            .ok_or_else(|| offset_overflow(bytes.len()))?;
        let (_, dst) = self.reserve_relative(len, field)?;
        let (payload, terminator) = dst.split_at_mut(bytes.len());
        payload.copy_from_slice(bytes);
        terminator[0] = TERMINATOR;
        Ok(self.get(field))
    }
}
