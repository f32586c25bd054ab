//! blitzbuffers is a zero-copy binary serialization runtime.
//!
//! Values are built directly into a byte buffer and read back directly from it: there
//! is no intermediate encoding or decoding step. A buffer carries no header and no
//! schema; the reader must know the type of the root record.
//!
//! # Wire format
//!
//! - Scalars are little-endian and unaligned.
//! - A record is its fields packed back to back in declaration order, without padding.
//!   Nested records declared `inline` occupy their own bytes within the parent.
//! - A variable-length field (string or array) occupies 4 bytes holding a `u32`
//!   self-relative offset: the distance from the field itself to the referenced data.
//!   Zero means absent, which reads as empty.
//! - A string is its bytes followed by a single `0` terminator.
//! - An array is a `u32` element count followed by the elements, each occupying the
//!   element type's fixed size.
//!
//! Referenced data is always appended after the field that references it, so offsets
//! are strictly positive and survive any relocation of the buffer as a whole.
//!
//! # Builders
//!
//! A [`BufferBuilder`] owns the buffer under construction. Two strategies are provided:
//!
//! - [`FixedBufferBuilder`] writes into a single pre-sized allocation, or into storage
//!   supplied by the caller, and fails with [`Error::CapacityExceeded`] when full.
//!   [`finalize`](BufferBuilder::finalize) never copies.
//! - [`ChunkedBufferBuilder`] grows by allocating chunks and copies them into one
//!   contiguous buffer at [`finalize`](BufferBuilder::finalize), only when more than one
//!   chunk was used.
//!
//! Both produce byte-identical output for the same sequence of writes.
//!
//! # Records
//!
//! Record types are declared with [`record!`] and enums with [`scalar_enum!`]. Each
//! record gets a plain value type, a zero-copy `…View` and an in-place `…Builder`.
//!
//! ```
//! use blitzbuffers::{record, scalar_enum, BufferBuilder, ChunkedBufferBuilder, FixedBufferBuilder};
//!
//! scalar_enum! {
//!     pub enum Color: u8 {
//!         None = 0,
//!         Red = 1,
//!         Blue = 2,
//!     }
//! }
//!
//! record! {
//!     pub struct Vec3 {
//!         x: scalar<f32>,
//!         y: scalar<f32>,
//!         z: scalar<f32>,
//!     }
//! }
//!
//! record! {
//!     pub struct Weapon {
//!         name: string,
//!         damage: scalar<i16>,
//!     }
//! }
//!
//! record! {
//!     pub struct Monster {
//!         pos: inline<Vec3>,
//!         name: string,
//!         inventory: primitive_array<u8>,
//!         color: scalar<Color>,
//!         weapons: array<Weapon>,
//!     }
//! }
//!
//! // Build in place, field by field.
//! let mut builder = ChunkedBufferBuilder::default();
//! let mut monster = Monster::new_on(&mut builder).unwrap();
//! monster.pos().set_x(1.0);
//! monster.set_color(Color::Red);
//! monster.insert_name("Orc").unwrap();
//! monster.insert_inventory_from(&[1, 2, 3]).unwrap();
//! let mut weapons = monster.insert_weapons(1).unwrap();
//! let mut axe = weapons.get(0).unwrap();
//! axe.insert_name("Axe").unwrap();
//! axe.set_damage(5);
//!
//! let bytes = builder.finalize().unwrap();
//! let view = Monster::view(bytes);
//! assert_eq!(view.pos().x(), 1.0);
//! assert_eq!(view.name(), "Orc");
//! assert_eq!(view.inventory().as_raw_bytes(), [1, 2, 3]);
//! assert_eq!(view.weapons().get(0).unwrap().damage(), 5);
//!
//! // Or write a whole value at once, and copy it back out.
//! let value = view.to_value().unwrap();
//! let mut fixed = FixedBufferBuilder::new(bytes.len()).unwrap();
//! assert_eq!(blitzbuffers::serialize_into(&mut fixed, &value).unwrap(), bytes);
//! ```
//!
//! # Trust
//!
//! Viewers do not validate their input. An offset or count that points outside the
//! buffer panics on slice indexing, and an undeclared enum tag panics in its accessor.
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub mod error;
pub use error::{Error, Result};
pub mod io;
pub use io::{BufferBuilder, ChunkedBufferBuilder, FixedBufferBuilder};
pub mod offset;
mod schema;
pub use schema::{
    containers::{
        BufferArray, BufferArrayIter, BufferArrayWriter, PrimitiveBufferArray,
        PrimitiveBufferArrayIter, PrimitiveBufferArrayWriter, StringView,
    },
    deserialize, serialize, serialize_into, Record,
};
#[cfg(test)]
mod proptest_config;

#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    pub use {
        alloc::{string::String, vec::Vec},
        paste::paste,
    };
}
