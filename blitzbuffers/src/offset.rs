//! Offset arithmetic primitives.
//!
//! Every location in a buffer is a byte displacement from the start of that buffer.
//! Scalars are stored little-endian and unaligned at such a displacement, and
//! variable-length data is linked to the field that references it with a
//! [`RelativeOffset`]: the distance from the field's own position to the data.
use {
    crate::error::{back_reference, offset_overflow, Result},
    core::num::NonZeroU32,
};

/// Width of a stored self-relative offset.
pub const OFFSET_SIZE: usize = size_of::<u32>();

/// Width of the element count that prefixes every array.
pub const COUNT_SIZE: usize = size_of::<u32>();

/// Largest logical buffer size addressable by a 32-bit offset.
pub const MAX_BUFFER_SIZE: usize = u32::MAX as usize;

/// A fixed-width value stored inline in a record.
///
/// Implementations must read and write exactly [`Scalar::SIZE`] bytes.
pub trait Scalar: Copy {
    const SIZE: usize;

    /// Decode from a slice of exactly `SIZE` bytes.
    fn read_le(src: &[u8]) -> Self;

    /// Encode into a slice of exactly `SIZE` bytes.
    fn write_le(self, dst: &mut [u8]);
}

macro_rules! impl_scalar {
    ($($type:ty),+ $(,)?) => {
        $(
            impl Scalar for $type {
                const SIZE: usize = size_of::<$type>();

                #[inline(always)]
                fn read_le(src: &[u8]) -> Self {
                    let mut bytes = [0u8; size_of::<$type>()];
                    bytes.copy_from_slice(src);
                    <$type>::from_le_bytes(bytes)
                }

                #[inline(always)]
                fn write_le(self, dst: &mut [u8]) {
                    dst.copy_from_slice(&self.to_le_bytes());
                }
            }
        )+
    };
}

impl_scalar!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

impl Scalar for bool {
    const SIZE: usize = 1;

    #[inline(always)]
    fn read_le(src: &[u8]) -> Self {
        src[0] != 0
    }

    #[inline(always)]
    fn write_le(self, dst: &mut [u8]) {
        dst[0] = self as u8;
    }
}

/// Read a scalar at byte displacement `at`.
///
/// # Panics
///
/// If `at + T::SIZE` is past the end of `buf`.
#[inline]
pub fn read_scalar<T: Scalar>(buf: &[u8], at: usize) -> T {
    T::read_le(&buf[at..at + T::SIZE])
}

/// Write a scalar at byte displacement `at`.
///
/// # Panics
///
/// If `at + T::SIZE` is past the end of `buf`.
#[inline]
pub fn write_scalar<T: Scalar>(buf: &mut [u8], at: usize, value: T) {
    value.write_le(&mut buf[at..at + T::SIZE]);
}

/// A self-relative reference stored in a 4-byte field.
///
/// The stored value is the distance from the field's own position to the referenced
/// data. Zero means the field references nothing, which is also what an unwritten
/// (zeroed) field reads as. Data is always appended after the field that references
/// it, so a present displacement is strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RelativeOffset {
    #[default]
    Absent,
    Present(NonZeroU32),
}

impl RelativeOffset {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        match NonZeroU32::new(raw) {
            Some(displacement) => Self::Present(displacement),
            None => Self::Absent,
        }
    }

    #[inline]
    pub const fn to_raw(self) -> u32 {
        match self {
            Self::Absent => 0,
            Self::Present(displacement) => displacement.get(),
        }
    }

    #[inline]
    pub const fn is_absent(self) -> bool {
        matches!(self, Self::Absent)
    }

    /// The reference from a field at `field` to data at `target`.
    ///
    /// Fails if `target` does not come strictly after `field`, or if the distance
    /// does not fit in 32 bits.
    pub fn link(field: usize, target: usize) -> Result<Self> {
        let displacement = match target.checked_sub(field) {
            Some(displacement) if displacement > 0 => displacement,
            _ => return Err(back_reference(field, target)),
        };
        let displacement = u32::try_from(displacement).map_err(|_| offset_overflow(displacement))?;
        Ok(Self::from_raw(displacement))
    }

    /// Position of the referenced data, given the position of the field holding
    /// this reference.
    #[inline]
    pub fn resolve(self, field: usize) -> Option<usize> {
        match self {
            Self::Absent => None,
            Self::Present(displacement) => Some(field + displacement.get() as usize),
        }
    }

    /// Read the reference stored at `field` and resolve it.
    #[inline]
    pub fn follow(buf: &[u8], field: usize) -> Option<usize> {
        read_scalar::<Self>(buf, field).resolve(field)
    }
}

impl Scalar for RelativeOffset {
    const SIZE: usize = OFFSET_SIZE;

    #[inline(always)]
    fn read_le(src: &[u8]) -> Self {
        Self::from_raw(u32::read_le(src))
    }

    #[inline(always)]
    fn write_le(self, dst: &mut [u8]) {
        self.to_raw().write_le(dst)
    }
}
