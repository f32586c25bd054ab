//! Variable-length members: strings and length-prefixed arrays.
//!
//! A variable-length member occupies a 4-byte [`RelativeOffset`] field in its record.
//! The data it references is appended to the buffer after the field:
//!
//! - A string is its bytes followed by a single [`TERMINATOR`]. It has no inline length.
//! - An array is a `u32` element count followed by that many elements, each
//!   occupying the element type's fixed size.
//!
//! An absent field reads as an empty string or array. Readers borrow the finalized
//! buffer and are [`Copy`]; writers borrow the [`BufferBuilder`] and address the
//! array by its logical offset.
use {
    crate::{
        error::{index_out_of_bounds, invalid_utf8_encoding, offset_overflow, Result},
        io::{BufferBuilder, TERMINATOR},
        offset::{read_scalar, RelativeOffset, Scalar, COUNT_SIZE},
        schema::Record,
    },
    alloc::vec::Vec,
    core::{fmt, iter::FusedIterator, marker::PhantomData, str},
};

/// Zero-copy view of a terminator-delimited string.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StringView<'a> {
    bytes: &'a [u8],
}

impl<'a> StringView<'a> {
    /// Resolve the string referenced by the offset field at `field`.
    ///
    /// A string missing its terminator extends to the end of `buf`.
    pub fn from_field(buf: &'a [u8], field: usize) -> Self {
        let Some(start) = RelativeOffset::follow(buf, field) else {
            return Self::default();
        };
        let tail = &buf[start..];
        let len = tail
            .iter()
            .position(|&b| b == TERMINATOR)
            .unwrap_or(tail.len());
        Self {
            bytes: &tail[..len],
        }
    }

    /// The string bytes, without the terminator.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_str(&self) -> Result<&'a str> {
        str::from_utf8(self.bytes).map_err(invalid_utf8_encoding)
    }
}

impl fmt::Debug for StringView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match str::from_utf8(self.bytes) {
            Ok(s) => fmt::Debug::fmt(s, f),
            Err(_) => fmt::Debug::fmt(self.bytes, f),
        }
    }
}

impl PartialEq<str> for StringView<'_> {
    fn eq(&self, other: &str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialEq<&str> for StringView<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.bytes == other.as_bytes()
    }
}

/// Locate the elements of the array referenced by the offset field at `field`.
///
/// Returns the position of the first element and the element count.
#[inline]
fn resolve_array(buf: &[u8], field: usize) -> (usize, usize) {
    match RelativeOffset::follow(buf, field) {
        Some(at) => (at + COUNT_SIZE, read_scalar::<u32>(buf, at) as usize),
        None => (0, 0),
    }
}

/// Zero-copy view of a length-prefixed array of records.
pub struct BufferArray<'a, T> {
    buf: &'a [u8],
    start: usize,
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for BufferArray<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BufferArray<'_, T> {}

impl<'a, T: Record> BufferArray<'a, T> {
    /// Resolve the array referenced by the offset field at `field`.
    pub fn from_field(buf: &'a [u8], field: usize) -> Self {
        let (start, len) = resolve_array(buf, field);
        Self {
            buf,
            start,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<T::View<'a>> {
        (index < self.len).then(|| T::view_at(self.buf, self.start + index * T::SIZE))
    }

    #[inline]
    pub fn iter(&self) -> BufferArrayIter<'a, T> {
        BufferArrayIter {
            array: *self,
            front: 0,
            back: self.len,
        }
    }

    /// Copy every element into its value type.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.iter().map(|view| T::read(view)).collect()
    }
}

impl<T: Record> fmt::Debug for BufferArray<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferArray")
            .field("start", &self.start)
            .field("len", &self.len)
            .finish()
    }
}

impl<'a, T: Record> IntoIterator for BufferArray<'a, T> {
    type Item = T::View<'a>;
    type IntoIter = BufferArrayIter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Record> IntoIterator for &BufferArray<'a, T> {
    type Item = T::View<'a>;
    type IntoIter = BufferArrayIter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the element views of a [`BufferArray`].
pub struct BufferArrayIter<'a, T> {
    array: BufferArray<'a, T>,
    front: usize,
    back: usize,
}

impl<T> Clone for BufferArrayIter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            array: self.array,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, T: Record> Iterator for BufferArrayIter<'a, T> {
    type Item = T::View<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = self.array.get(self.front);
        self.front += 1;
        item
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<T: Record> DoubleEndedIterator for BufferArrayIter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.array.get(self.back)
    }
}

impl<T: Record> ExactSizeIterator for BufferArrayIter<'_, T> {}

impl<T: Record> FusedIterator for BufferArrayIter<'_, T> {}

/// Zero-copy view of a length-prefixed array of scalars.
pub struct PrimitiveBufferArray<'a, T> {
    bytes: &'a [u8],
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for PrimitiveBufferArray<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PrimitiveBufferArray<'_, T> {}

impl<'a, T: Scalar> PrimitiveBufferArray<'a, T> {
    /// Resolve the array referenced by the offset field at `field`.
    pub fn from_field(buf: &'a [u8], field: usize) -> Self {
        let (start, len) = resolve_array(buf, field);
        Self {
            bytes: &buf[start..start + len * T::SIZE],
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        (index < self.len).then(|| read_scalar(self.bytes, index * T::SIZE))
    }

    /// The encoded elements, without the count prefix.
    #[inline]
    pub fn as_raw_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[inline]
    pub fn iter(&self) -> PrimitiveBufferArrayIter<'a, T> {
        PrimitiveBufferArrayIter {
            chunks: self.bytes.chunks_exact(T::SIZE),
            _marker: PhantomData,
        }
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T: Scalar + fmt::Debug> fmt::Debug for PrimitiveBufferArray<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T: Scalar> IntoIterator for PrimitiveBufferArray<'a, T> {
    type Item = T;
    type IntoIter = PrimitiveBufferArrayIter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Scalar> IntoIterator for &PrimitiveBufferArray<'a, T> {
    type Item = T;
    type IntoIter = PrimitiveBufferArrayIter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of a [`PrimitiveBufferArray`].
#[derive(Clone)]
pub struct PrimitiveBufferArrayIter<'a, T> {
    chunks: core::slice::ChunksExact<'a, u8>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Scalar> Iterator for PrimitiveBufferArrayIter<'_, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.chunks.next().map(T::read_le)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl<T: Scalar> DoubleEndedIterator for PrimitiveBufferArrayIter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.chunks.next_back().map(T::read_le)
    }
}

impl<T: Scalar> ExactSizeIterator for PrimitiveBufferArrayIter<'_, T> {}

impl<T: Scalar> FusedIterator for PrimitiveBufferArrayIter<'_, T> {}

/// Reserve an array of `len` elements of `stride` bytes, write its count and link it
/// to the offset field at `field`.
///
/// Returns the logical offset of the first element. An empty array reserves nothing
/// and leaves the field absent.
fn reserve_array<B: BufferBuilder>(
    builder: &mut B,
    len: usize,
    stride: usize,
    field: usize,
) -> Result<usize> {
    if len == 0 {
        builder.ensure_unlinked(field)?;
        return Ok(builder.size());
    }
    let count = u32::try_from(len).map_err(|_| offset_overflow(len))?;
    let size = len
        .checked_mul(stride)
        .and_then(|bytes| bytes.checked_add(COUNT_SIZE))
        .ok_or_else(|| offset_overflow(len))?;
    let (offset, dst) = builder.reserve_relative(size, field)?;
    count.write_le(&mut dst[..COUNT_SIZE]);
    Ok(offset + COUNT_SIZE)
}

/// Writer for a length-prefixed array of records.
///
/// Elements start zeroed; each is written through its record builder.
pub struct BufferArrayWriter<'a, T, B> {
    builder: &'a mut B,
    start: usize,
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: Record, B: BufferBuilder> BufferArrayWriter<'a, T, B> {
    /// Reserve `len` elements and link them to the offset field at `field`.
    pub fn make_and_set_offset(builder: &'a mut B, len: usize, field: usize) -> Result<Self> {
        let start = reserve_array(builder, len, T::SIZE, field)?;
        Ok(Self {
            builder,
            start,
            len,
            _marker: PhantomData,
        })
    }

    /// Reserve and write `values` as an array linked to the offset field at `field`.
    pub fn write_all(builder: &'a mut B, field: usize, values: &[T]) -> Result<()> {
        let mut writer = Self::make_and_set_offset(builder, values.len(), field)?;
        for (index, value) in values.iter().enumerate() {
            writer.set(index, value)?;
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Logical offset of the first element.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Builder for the element at `index`.
    #[inline]
    pub fn get(&mut self, index: usize) -> Option<T::Builder<'_, B>> {
        if index >= self.len {
            return None;
        }
        Some(T::bind(&mut *self.builder, self.start + index * T::SIZE))
    }

    /// Write the full value of the element at `index`.
    pub fn set(&mut self, index: usize, value: &T) -> Result<()> {
        if index >= self.len {
            return Err(index_out_of_bounds(index, self.len));
        }
        T::write_at(&mut *self.builder, self.start + index * T::SIZE, value)
    }
}

/// Writer for a length-prefixed array of scalars.
pub struct PrimitiveBufferArrayWriter<'a, T, B> {
    builder: &'a mut B,
    start: usize,
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: Scalar, B: BufferBuilder> PrimitiveBufferArrayWriter<'a, T, B> {
    /// Reserve `len` elements and link them to the offset field at `field`.
    pub fn make_and_set_offset(builder: &'a mut B, len: usize, field: usize) -> Result<Self> {
        let start = reserve_array(builder, len, T::SIZE, field)?;
        Ok(Self {
            builder,
            start,
            len,
            _marker: PhantomData,
        })
    }

    /// Reserve and write `values` as an array linked to the offset field at `field`.
    pub fn write_all(builder: &'a mut B, field: usize, values: &[T]) -> Result<()> {
        let Self { builder, start, .. } = Self::make_and_set_offset(builder, values.len(), field)?;
        if values.is_empty() {
            return Ok(());
        }
        let dst = builder.span_mut(start, values.len() * T::SIZE);
        for (dst, &value) in dst.chunks_exact_mut(T::SIZE).zip(values) {
            value.write_le(dst);
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Logical offset of the first element.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        (index < self.len).then(|| self.builder.get(self.start + index * T::SIZE))
    }

    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        if index >= self.len {
            return Err(index_out_of_bounds(index, self.len));
        }
        self.builder.put(self.start + index * T::SIZE, value);
        Ok(())
    }
}
