//! Declarative macros that emit record and enum types.
//!
//! [`record!`](crate::record!) lays out a record's fields back to back in declaration
//! order, with no padding, and emits three types per record:
//!
//! - the plain value type, with one public field per declared field;
//! - `<Name>View<'a>`, a zero-copy viewer over an encoded record;
//! - `<Name>Builder<'a, B>`, an in-place builder over a [`BufferBuilder`](crate::BufferBuilder).
//!
//! Field kinds:
//!
//! | kind                 | stored as            | value type  | viewer accessor            | builder accessors                                   |
//! |----------------------|----------------------|-------------|----------------------------|-----------------------------------------------------|
//! | `scalar<T>`          | `T::SIZE` bytes      | `T`         | `field() -> T`             | `field()`, `set_field(T)`                           |
//! | `inline<T>`          | `T::SIZE` bytes      | `T`         | `field() -> T::View`       | `field() -> T::Builder`, `set_field(&T)`            |
//! | `string`             | 4-byte offset        | `String`    | `field() -> StringView`    | `insert_field(bytes)`                               |
//! | `array<T>`           | 4-byte offset        | `Vec<T>`    | `field() -> BufferArray`   | `insert_field(len)`, `insert_field_from(&[T])`      |
//! | `primitive_array<T>` | 4-byte offset        | `Vec<T>`    | `field() -> PrimitiveBufferArray` | `insert_field(len)`, `insert_field_from(&[T])` |
//!
//! Viewers and builders also expose `offset()`, so no field may be named `offset`,
//! `set` or `to_value`.

/// Declare a record type with its zero-copy viewer and in-place builder.
///
/// See the [module documentation](crate#records) for the available field kinds.
///
/// # Examples
///
/// ```
/// use blitzbuffers::{record, BufferBuilder, ChunkedBufferBuilder, Record};
///
/// record! {
///     pub struct Point {
///         x: scalar<f32>,
///         y: scalar<f32>,
///     }
/// }
///
/// record! {
///     pub struct Path {
///         origin: inline<Point>,
///         label: string,
///         steps: array<Point>,
///     }
/// }
///
/// assert_eq!(Point::SIZE, 8);
/// assert_eq!(Path::SIZE, 16);
/// assert_eq!(Path::STEPS_OFFSET, 12);
///
/// let mut builder = ChunkedBufferBuilder::default();
/// let mut path = Path::new_on(&mut builder).unwrap();
/// path.origin().set_y(1.5);
/// path.insert_label("home").unwrap();
/// let mut steps = path.insert_steps(2).unwrap();
/// steps.get(1).unwrap().set_x(3.0);
///
/// let view = Path::view(builder.finalize().unwrap());
/// assert_eq!(view.origin().y(), 1.5);
/// assert_eq!(view.label(), "home");
/// assert_eq!(view.steps().len(), 2);
/// assert_eq!(view.steps().get(1).unwrap().x(), 3.0);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $kind:ident $(<$ty:ty>)?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $crate::__record_value!($kind $(, $ty)?),
            )+
        }

        $crate::__private::paste! {
            #[doc = concat!("Zero-copy viewer over an encoded [`", stringify!($name), "`].")]
            #[derive(Clone, Copy)]
            $vis struct [<$name View>]<'a> {
                buf: &'a [u8],
                offset: usize,
            }

            #[doc = concat!("In-place builder of an encoded [`", stringify!($name), "`].")]
            $vis struct [<$name Builder>]<'a, B: $crate::BufferBuilder> {
                builder: &'a mut B,
                offset: usize,
            }

            impl $name {
                #[inline]
                pub const fn size() -> usize {
                    <Self as $crate::Record>::SIZE
                }

                /// View the record at the start of `buf`.
                #[inline]
                pub fn view(buf: &[u8]) -> [<$name View>]<'_> {
                    <Self as $crate::Record>::view(buf)
                }

                /// Reserve a new record at the end of `builder`.
                #[inline]
                pub fn new_on<B: $crate::BufferBuilder>(
                    builder: &mut B,
                ) -> $crate::Result<[<$name Builder>]<'_, B>> {
                    <Self as $crate::Record>::new_on(builder)
                }
            }

            impl<'a> [<$name View>]<'a> {
                /// Position of the record in the buffer.
                #[inline]
                pub fn offset(&self) -> usize {
                    self.offset
                }

                /// Copy the full value graph out of the buffer.
                pub fn to_value(&self) -> $crate::Result<$name> {
                    <$name as $crate::Record>::read(*self)
                }
            }

            impl<'a, B: $crate::BufferBuilder> [<$name Builder>]<'a, B> {
                /// Logical offset of the record in the buffer under construction.
                #[inline]
                pub fn offset(&self) -> usize {
                    self.offset
                }

                /// Write every field of `value`: inline fields in place, variable-length
                /// fields appended in declaration order.
                pub fn set(&mut self, value: &$name) -> $crate::Result<()> {
                    <$name as $crate::Record>::write_at(&mut *self.builder, self.offset, value)
                }
            }

            impl $crate::Record for $name {
                const SIZE: usize = 0 $(+ $crate::__record_width!($kind $(, $ty)?))+;
                type View<'a> = [<$name View>]<'a>;
                type Builder<'a, B: $crate::BufferBuilder + 'a> = [<$name Builder>]<'a, B>;

                #[inline]
                fn view_at(buf: &[u8], offset: usize) -> Self::View<'_> {
                    [<$name View>] { buf, offset }
                }

                #[inline]
                fn bind<'a, B: $crate::BufferBuilder + 'a>(
                    builder: &'a mut B,
                    offset: usize,
                ) -> Self::Builder<'a, B> {
                    [<$name Builder>] { builder, offset }
                }

                fn write_at<B: $crate::BufferBuilder>(
                    builder: &mut B,
                    offset: usize,
                    value: &Self,
                ) -> $crate::Result<()> {
                    $(
                        $crate::__record_write!(
                            builder,
                            offset + Self::[<$field:upper _OFFSET>],
                            &value.$field;
                            $kind $(, $ty)?
                        );
                    )+
                    Ok(())
                }

                fn read(view: Self::View<'_>) -> $crate::Result<Self> {
                    Ok(Self {
                        $($field: $crate::__record_read!(view, $field; $kind $(, $ty)?),)+
                    })
                }
            }
        }

        $crate::__record_fields! { $name; 0usize; $($field : $kind $(<$ty>)?),+ }
    };
}

/// Declare a fieldless enum stored as its underlying integer.
///
/// One variant must carry the tag `0`. It is the [`Default`], which keeps a zeroed
/// field of a freshly reserved record readable. Conversion from the integer is
/// checked through [`TryFrom`]; a viewer reading an undeclared tag panics.
///
/// # Examples
///
/// ```
/// use blitzbuffers::{scalar_enum, Error};
///
/// scalar_enum! {
///     pub enum Color: u8 {
///         None = 0,
///         Red = 1,
///         Green = 2,
///     }
/// }
///
/// assert_eq!(Color::default(), Color::None);
/// assert_eq!(Color::try_from(2u8).unwrap(), Color::Green);
/// assert_eq!(u8::from(Color::Red), 1);
/// assert!(matches!(Color::try_from(9u8), Err(Error::InvalidEnumTag(9))));
/// ```
///
/// An enum without a `0` tag is rejected:
///
/// ```compile_fail
/// use blitzbuffers::scalar_enum;
///
/// scalar_enum! {
///     pub enum Level: u8 {
///         Low = 1,
///         High = 2,
///     }
/// }
/// ```
#[macro_export]
macro_rules! scalar_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr($repr)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant = $value,
            )+
        }

        impl $name {
            const __ZERO: Self = $(if Self::$variant as $repr == 0 {
                Self::$variant
            } else)+ {
                ::core::panic!(::core::concat!(
                    "`",
                    ::core::stringify!($name),
                    "` must declare a variant with tag 0"
                ))
            };
        }

        const _: $name = $name::__ZERO;

        impl ::core::default::Default for $name {
            #[inline]
            fn default() -> Self {
                Self::__ZERO
            }
        }

        impl ::core::convert::TryFrom<$repr> for $name {
            type Error = $crate::Error;

            fn try_from(tag: $repr) -> $crate::Result<Self> {
                match tag {
                    $(tag if tag == Self::$variant as $repr => Ok(Self::$variant),)+
                    _ => Err($crate::error::invalid_enum_tag(tag as i128)),
                }
            }
        }

        impl ::core::convert::From<$name> for $repr {
            #[inline]
            fn from(value: $name) -> Self {
                value as $repr
            }
        }

        impl $crate::offset::Scalar for $name {
            const SIZE: usize = <$repr as $crate::offset::Scalar>::SIZE;

            #[inline]
            fn read_le(src: &[u8]) -> Self {
                let tag = <$repr as $crate::offset::Scalar>::read_le(src);
                match <Self as ::core::convert::TryFrom<$repr>>::try_from(tag) {
                    Ok(value) => value,
                    Err(error) => $crate::error::malformed(error),
                }
            }

            #[inline]
            fn write_le(self, dst: &mut [u8]) {
                <$repr as $crate::offset::Scalar>::write_le(self as $repr, dst)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_value {
    (scalar, $ty:ty) => { $ty };
    (inline, $ty:ty) => { $ty };
    (string) => { $crate::__private::String };
    (array, $ty:ty) => { $crate::__private::Vec<$ty> };
    (primitive_array, $ty:ty) => { $crate::__private::Vec<$ty> };
    ($kind:ident $($rest:tt)*) => {
        ::core::compile_error!(::core::concat!(
            "unknown field kind `",
            ::core::stringify!($kind),
            "`, expected one of `scalar<T>`, `inline<T>`, `string`, `array<T>`, `primitive_array<T>`"
        ))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_width {
    (scalar, $ty:ty) => { <$ty as $crate::offset::Scalar>::SIZE };
    (inline, $ty:ty) => { <$ty as $crate::Record>::SIZE };
    ($kind:ident $(, $ty:ty)?) => { $crate::offset::OFFSET_SIZE };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_write {
    ($builder:ident, $at:expr, $value:expr; scalar, $ty:ty) => {
        $crate::BufferBuilder::put::<$ty>(&mut *$builder, $at, *$value)
    };
    ($builder:ident, $at:expr, $value:expr; inline, $ty:ty) => {
        <$ty as $crate::Record>::write_at(&mut *$builder, $at, $value)?
    };
    ($builder:ident, $at:expr, $value:expr; string) => {
        $crate::BufferBuilder::write_string(&mut *$builder, $value.as_bytes(), $at)?
    };
    ($builder:ident, $at:expr, $value:expr; array, $ty:ty) => {
        $crate::BufferArrayWriter::<$ty, _>::write_all(&mut *$builder, $at, $value)?
    };
    ($builder:ident, $at:expr, $value:expr; primitive_array, $ty:ty) => {
        $crate::PrimitiveBufferArrayWriter::<$ty, _>::write_all(&mut *$builder, $at, $value)?
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_read {
    ($view:ident, $field:ident; scalar, $ty:ty) => {
        $view.$field()
    };
    ($view:ident, $field:ident; inline, $ty:ty) => {
        <$ty as $crate::Record>::read($view.$field())?
    };
    ($view:ident, $field:ident; string) => {
        $crate::__private::String::from($view.$field().to_str()?)
    };
    ($view:ident, $field:ident; array, $ty:ty) => {
        $view.$field().to_vec()?
    };
    ($view:ident, $field:ident; primitive_array, $ty:ty) => {
        $view.$field().to_vec()
    };
}

/// Emits each field's offset constant and accessors, accumulating the offset.
#[doc(hidden)]
#[macro_export]
macro_rules! __record_fields {
    ($name:ident; $acc:expr;) => {};
    ($name:ident; $acc:expr; $field:ident : $kind:ident $(<$ty:ty>)? $(, $($rest:tt)*)?) => {
        $crate::__private::paste! {
            impl $name {
                #[doc = concat!("Position of `", stringify!($field), "` within the record.")]
                pub const [<$field:upper _OFFSET>]: usize = $acc;
            }
        }
        $crate::__record_accessors! { $kind; $name; $field; $($ty)? }
        $crate::__record_fields! {
            $name;
            $acc + $crate::__record_width!($kind $(, $ty)?);
            $($($rest)*)?
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_accessors {
    (scalar; $name:ident; $field:ident; $ty:ty) => {
        $crate::__private::paste! {
            impl<'a> [<$name View>]<'a> {
                #[inline]
                pub fn $field(&self) -> $ty {
                    $crate::offset::read_scalar(self.buf, self.offset + $name::[<$field:upper _OFFSET>])
                }
            }

            impl<'a, B: $crate::BufferBuilder> [<$name Builder>]<'a, B> {
                #[inline]
                pub fn $field(&self) -> $ty {
                    $crate::BufferBuilder::get(&*self.builder, self.offset + $name::[<$field:upper _OFFSET>])
                }

                #[inline]
                pub fn [<set_ $field>](&mut self, value: $ty) {
                    $crate::BufferBuilder::put(
                        &mut *self.builder,
                        self.offset + $name::[<$field:upper _OFFSET>],
                        value,
                    )
                }
            }
        }
    };
    (inline; $name:ident; $field:ident; $ty:ty) => {
        $crate::__private::paste! {
            impl<'a> [<$name View>]<'a> {
                #[inline]
                pub fn $field(&self) -> <$ty as $crate::Record>::View<'a> {
                    <$ty as $crate::Record>::view_at(self.buf, self.offset + $name::[<$field:upper _OFFSET>])
                }
            }

            impl<'a, B: $crate::BufferBuilder> [<$name Builder>]<'a, B> {
                #[inline]
                pub fn $field(&mut self) -> <$ty as $crate::Record>::Builder<'_, B> {
                    <$ty as $crate::Record>::bind(
                        &mut *self.builder,
                        self.offset + $name::[<$field:upper _OFFSET>],
                    )
                }

                pub fn [<set_ $field>](&mut self, value: &$ty) -> $crate::Result<()> {
                    <$ty as $crate::Record>::write_at(
                        &mut *self.builder,
                        self.offset + $name::[<$field:upper _OFFSET>],
                        value,
                    )
                }
            }
        }
    };
    (string; $name:ident; $field:ident;) => {
        $crate::__private::paste! {
            impl<'a> [<$name View>]<'a> {
                #[inline]
                pub fn $field(&self) -> $crate::StringView<'a> {
                    $crate::StringView::from_field(self.buf, self.offset + $name::[<$field:upper _OFFSET>])
                }
            }

            impl<'a, B: $crate::BufferBuilder> [<$name Builder>]<'a, B> {
                /// Append the string and link it. An empty string leaves the field absent.
                pub fn [<insert_ $field>](&mut self, value: impl AsRef<[u8]>) -> $crate::Result<()> {
                    $crate::BufferBuilder::write_string(
                        &mut *self.builder,
                        value.as_ref(),
                        self.offset + $name::[<$field:upper _OFFSET>],
                    )?;
                    Ok(())
                }
            }
        }
    };
    (array; $name:ident; $field:ident; $ty:ty) => {
        $crate::__private::paste! {
            impl<'a> [<$name View>]<'a> {
                #[inline]
                pub fn $field(&self) -> $crate::BufferArray<'a, $ty> {
                    $crate::BufferArray::from_field(self.buf, self.offset + $name::[<$field:upper _OFFSET>])
                }
            }

            impl<'a, B: $crate::BufferBuilder> [<$name Builder>]<'a, B> {
                /// Append `len` zeroed elements and link them.
                pub fn [<insert_ $field>](
                    &mut self,
                    len: usize,
                ) -> $crate::Result<$crate::BufferArrayWriter<'_, $ty, B>> {
                    $crate::BufferArrayWriter::make_and_set_offset(
                        &mut *self.builder,
                        len,
                        self.offset + $name::[<$field:upper _OFFSET>],
                    )
                }

                pub fn [<insert_ $field _from>](&mut self, values: &[$ty]) -> $crate::Result<()> {
                    $crate::BufferArrayWriter::write_all(
                        &mut *self.builder,
                        self.offset + $name::[<$field:upper _OFFSET>],
                        values,
                    )
                }
            }
        }
    };
    (primitive_array; $name:ident; $field:ident; $ty:ty) => {
        $crate::__private::paste! {
            impl<'a> [<$name View>]<'a> {
                #[inline]
                pub fn $field(&self) -> $crate::PrimitiveBufferArray<'a, $ty> {
                    $crate::PrimitiveBufferArray::from_field(
                        self.buf,
                        self.offset + $name::[<$field:upper _OFFSET>],
                    )
                }
            }

            impl<'a, B: $crate::BufferBuilder> [<$name Builder>]<'a, B> {
                /// Append `len` zeroed elements and link them.
                pub fn [<insert_ $field>](
                    &mut self,
                    len: usize,
                ) -> $crate::Result<$crate::PrimitiveBufferArrayWriter<'_, $ty, B>> {
                    $crate::PrimitiveBufferArrayWriter::make_and_set_offset(
                        &mut *self.builder,
                        len,
                        self.offset + $name::[<$field:upper _OFFSET>],
                    )
                }

                pub fn [<insert_ $field _from>](&mut self, values: &[$ty]) -> $crate::Result<()> {
                    $crate::PrimitiveBufferArrayWriter::write_all(
                        &mut *self.builder,
                        self.offset + $name::[<$field:upper _OFFSET>],
                        values,
                    )
                }
            }
        }
    };
}
