//! Error types and helpers.
use {core::str::Utf8Error, thiserror::Error};

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Attempting to reserve {requested} bytes at offset {size} of a buffer with capacity \
         {capacity}"
    )]
    CapacityExceeded {
        requested: usize,
        size: usize,
        capacity: usize,
    },
    #[error("Failed to allocate {0} bytes of backing storage")]
    AllocationFailure(usize),
    #[error("Buffer length would overflow the 32-bit offset range (needed {0})")]
    OffsetOverflow(usize),
    #[error("Data at offset {target} does not follow its referencing field at offset {field}")]
    BackReference { field: usize, target: usize },
    #[error("Field at offset {field} is already linked to data")]
    AlreadyInserted { field: usize },
    #[error("String payload contains a terminator byte at position {position}")]
    InteriorTerminator { position: usize },
    #[error("Index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error(transparent)]
    InvalidUtf8Encoding(#[from] Utf8Error),
    #[error("Invalid enum tag: {0}")]
    InvalidEnumTag(i128),
}

pub type Result<T> = core::result::Result<T, Error>;

#[cold]
pub const fn capacity_exceeded(requested: usize, size: usize, capacity: usize) -> Error {
    Error::CapacityExceeded {
        requested,
        size,
        capacity,
    }
}

#[cold]
pub const fn allocation_failure(len: usize) -> Error {
    Error::AllocationFailure(len)
}

#[cold]
pub const fn offset_overflow(len: usize) -> Error {
    Error::OffsetOverflow(len)
}

#[cold]
pub const fn back_reference(field: usize, target: usize) -> Error {
    Error::BackReference { field, target }
}

#[cold]
pub const fn already_inserted(field: usize) -> Error {
    Error::AlreadyInserted { field }
}

#[cold]
pub const fn interior_terminator(position: usize) -> Error {
    Error::InteriorTerminator { position }
}

#[cold]
pub const fn index_out_of_bounds(index: usize, len: usize) -> Error {
    Error::IndexOutOfBounds { index, len }
}

#[cold]
pub const fn invalid_utf8_encoding(error: Utf8Error) -> Error {
    Error::InvalidUtf8Encoding(error)
}

#[cold]
pub const fn invalid_enum_tag(tag: i128) -> Error {
    Error::InvalidEnumTag(tag)
}

/// Abort a read of a buffer that does not hold what its viewer expects.
///
/// Viewers trust their input, so a malformed buffer is a bug in the producer.
#[cold]
#[track_caller]
pub fn malformed(error: Error) -> ! {
    panic!("malformed buffer: {error}")
}
