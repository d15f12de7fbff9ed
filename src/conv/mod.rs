//! Core of the cell-conversion API
//!
//! This module contains definitions for the high-level traits [`Store`] and
//! [`Load`], which are motivationally equivalent to `Serialize` and
//! `Deserialize` in `serde`, but speak in terms of cells: a `Store` value
//! appends its bits and references to a [`CellBuilder`], and a `Load` value
//! reads itself back from a [`CellSlice`].
//!
//! Primitive implementations cover the unsigned integers (at their natural
//! width), `i8`, `bool`, and references. Composite layouts either implement
//! the traits by hand or derive them with `#[derive(Store, Load)]`, which
//! stores every field in declaration order.
//!
//! The sub-module [`target`] offers the bit-level `Target` abstraction that
//! both the concrete bit buffer and the measuring [`target::BitCounter`] implement.

use crate::builder::CellBuilder;
use crate::cell::Cell;
use crate::error::EncodeResult;
use crate::slice::{CellSlice, ParseResult};

pub mod target;

/// Trait for types that can be appended to a cell under construction
///
/// Implementing [`Store`] is as simple as providing [`store_into`], which
/// should be structurally inductive on the fields of the type, in the exact
/// order the receiving contract expects to read them.
///
/// [`store_into`]: Store::store_into
pub trait Store {
    /// Appends the serialized bits and references of this value to `builder`.
    ///
    /// On error, some fields of a composite value may already have been
    /// appended; the builder should then be discarded.
    fn store_into(&self, builder: &mut CellBuilder) -> EncodeResult<()>;

    /// Stores this value alone into a fresh builder and finalizes it.
    fn to_cell(&self) -> EncodeResult<Cell> {
        let mut builder = CellBuilder::new();
        self.store_into(&mut builder)?;
        Ok(builder.build())
    }
}

/// Trait for types that can be read back from a cell
///
/// It is almost always expected that a type implementing `Load` will also
/// implement [`Store`], with `load_from` consuming exactly what
/// `store_into` produced.
pub trait Load: Sized {
    /// Reads a value from the current position of `slice`, advancing it.
    fn load_from(slice: &mut CellSlice<'_>) -> ParseResult<Self>;

    /// Reads a value from the start of `cell`, requiring that it consumes
    /// the whole cell.
    fn from_cell(cell: &Cell) -> ParseResult<Self> {
        let mut slice = cell.as_slice();
        let ret = Self::load_from(&mut slice)?;
        slice.end_parse()?;
        Ok(ret)
    }
}

impl<T: Store + ?Sized> Store for &T {
    fn store_into(&self, builder: &mut CellBuilder) -> EncodeResult<()> {
        (**self).store_into(builder)
    }
}

macro_rules! impl_uint {
    ($t:ty, $bits:expr) => {
        impl Store for $t {
            fn store_into(&self, builder: &mut CellBuilder) -> EncodeResult<()> {
                builder.store_uint(*self as u64, $bits)?;
                Ok(())
            }
        }

        impl Load for $t {
            fn load_from(slice: &mut CellSlice<'_>) -> ParseResult<Self> {
                // Width matches the type, so the narrowing cast is lossless
                Ok(slice.load_uint($bits)? as $t)
            }
        }
    };
}

impl_uint!(u8, 8);
impl_uint!(u16, 16);
impl_uint!(u32, 32);
impl_uint!(u64, 64);

impl Store for i8 {
    fn store_into(&self, builder: &mut CellBuilder) -> EncodeResult<()> {
        builder.store_int(*self as i64, 8)?;
        Ok(())
    }
}

impl Load for i8 {
    fn load_from(slice: &mut CellSlice<'_>) -> ParseResult<Self> {
        Ok(slice.load_int(8)? as i8)
    }
}

impl Store for bool {
    fn store_into(&self, builder: &mut CellBuilder) -> EncodeResult<()> {
        builder.store_bit(*self)?;
        Ok(())
    }
}

impl Load for bool {
    fn load_from(slice: &mut CellSlice<'_>) -> ParseResult<Self> {
        slice.load_bit()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(crate::Store, crate::Load, Debug, PartialEq, Eq)]
    struct Header {
        op: u32,
        flag: bool,
        wc: i8,
    }

    #[derive(crate::Store, crate::Load, Debug, PartialEq, Eq)]
    struct Pair(u8, u16);

    #[test]
    fn derived_fields_are_stored_in_order() {
        let h = Header {
            op: 0xdead_beef,
            flag: true,
            wc: -1,
        };
        let cell = h.to_cell().unwrap();
        assert_eq!(cell.bit_len(), 32 + 1 + 8);
        assert_eq!(&cell.data()[..4], &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(Header::from_cell(&cell).unwrap(), h);
    }

    #[test]
    fn derived_tuple_roundtrip() {
        let cell = Pair(7, 0x0102).to_cell().unwrap();
        assert_eq!(cell.data(), &[0x07, 0x01, 0x02]);
        assert_eq!(Pair::from_cell(&cell).unwrap(), Pair(7, 0x0102));
    }

    #[test]
    fn from_cell_rejects_leftover() {
        let cell = (0x0102u16).to_cell().unwrap();
        assert!(u8::from_cell(&cell).is_err());
    }
}
