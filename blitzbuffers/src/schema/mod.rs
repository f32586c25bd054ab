//! The [`Record`] trait and whole-value helpers.
//!
//! Record types are declared with [`record!`](crate::record!), which implements
//! [`Record`] and emits the viewer and builder types.
use {
    crate::{
        error::Result,
        io::{BufferBuilder, ChunkedBufferBuilder},
    },
    alloc::vec::Vec,
};

pub mod containers;
mod impls;

/// A fixed-size, padding-free record with a zero-copy viewer and an in-place builder.
///
/// A record occupies exactly [`Record::SIZE`] bytes. Inline fields are stored in
/// those bytes; variable-length fields store a self-relative offset there and append
/// their data to the buffer.
pub trait Record: Sized {
    const SIZE: usize;

    /// Read-only accessor over an encoded record.
    type View<'a>: Copy;

    /// Mutable accessor over a record reserved in a [`BufferBuilder`].
    type Builder<'a, B: BufferBuilder + 'a>;

    /// View the record at position `offset` of `buf`.
    fn view_at(buf: &[u8], offset: usize) -> Self::View<'_>;

    /// Bind a builder to the record reserved at logical `offset`.
    fn bind<'a, B: BufferBuilder + 'a>(builder: &'a mut B, offset: usize) -> Self::Builder<'a, B>;

    /// Write `value` into the record reserved at logical `offset`.
    fn write_at<B: BufferBuilder>(builder: &mut B, offset: usize, value: &Self) -> Result<()>;

    /// Copy the value graph out of a view.
    fn read(view: Self::View<'_>) -> Result<Self>;

    /// View the record at the start of `buf`.
    #[inline]
    fn view(buf: &[u8]) -> Self::View<'_> {
        Self::view_at(buf, 0)
    }

    /// Reserve a new zeroed record at the end of `builder`.
    fn new_on<B: BufferBuilder>(builder: &mut B) -> Result<Self::Builder<'_, B>> {
        let (offset, _) = builder.reserve(Self::SIZE)?;
        Ok(Self::bind(builder, offset))
    }
}

/// Clear `builder`, write `value` as its root record and finalize.
///
/// # Examples
///
/// ```
/// # use blitzbuffers::{record, serialize_into, FixedBufferBuilder};
/// record! {
///     struct Greeting {
///         id: scalar<u16>,
///         text: string,
///     }
/// }
///
/// let greeting = Greeting { id: 7, text: "hi".into() };
/// let mut builder = FixedBufferBuilder::new(64).unwrap();
/// let bytes = serialize_into(&mut builder, &greeting).unwrap();
/// assert_eq!(bytes, [7, 0, 4, 0, 0, 0, b'h', b'i', 0]);
/// assert_eq!(Greeting::view(bytes).to_value().unwrap(), greeting);
/// ```
pub fn serialize_into<'b, T: Record, B: BufferBuilder>(
    builder: &'b mut B,
    value: &T,
) -> Result<&'b [u8]> {
    builder.clear();
    let (offset, _) = builder.reserve(T::SIZE)?;
    T::write_at(builder, offset, value)?;
    builder.finalize()
}

/// Serialize `value` into a new `Vec<u8>`.
pub fn serialize<T: Record>(value: &T) -> Result<Vec<u8>> {
    let mut builder = ChunkedBufferBuilder::default();
    Ok(serialize_into(&mut builder, value)?.to_vec())
}

/// Copy the root record of `buf` into its value type.
#[inline]
pub fn deserialize<T: Record>(buf: &[u8]) -> Result<T> {
    T::read(T::view(buf))
}
