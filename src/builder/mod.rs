//! Accumulator for the contents of a single cell
//!
//! [`CellBuilder`] is the write-only counterpart of [`Cell`]: bits and
//! references are appended to it, and [`CellBuilder::build`] consumes it to
//! produce exactly one immutable cell.
//!
//! # Design
//!
//! Every `store_*` method checks range and capacity *before* touching the
//! buffer, so a method that returns an error leaves the builder exactly as it
//! was. Methods return `&mut Self` on success so that fixed layouts read as a
//! single chain:
//!
//! ```
//! # use cellar::builder::CellBuilder;
//! # fn main() -> cellar::error::EncodeResult<()> {
//! let mut b = CellBuilder::new();
//! b.store_uint(1, 32)?.store_uint(0, 64)?;
//! let cell = b.build();
//! assert_eq!(cell.bit_len(), 96);
//! # Ok(())
//! # }
//! ```
//!
//! Composite values go through [`Store`]; a composite that fails half-way
//! may leave earlier fields appended, and the builder should be dropped.

use num_bigint::BigUint;

use crate::address::Address;
use crate::bits::BitString;
use crate::cell::{Cell, CellRefs, MAX_CELL_BITS, MAX_CELL_REFS};
use crate::coins::{Coins, COINS_LEN_BITS, MAX_COINS_BYTES};
use crate::conv::target::Target;
use crate::conv::Store;
use crate::dict::Dictionary;
use crate::error::{CapacityError, EncodeError, EncodeResult, RangeError};

/// Mutable staging area for one cell
#[derive(Clone, Default, Debug)]
pub struct CellBuilder {
    bits: BitString,
    refs: CellRefs,
}

impl CellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits appended so far
    pub fn bits_used(&self) -> usize {
        self.bits.len()
    }

    pub fn refs_used(&self) -> usize {
        self.refs.len()
    }

    pub fn available_bits(&self) -> usize {
        MAX_CELL_BITS - self.bits.len()
    }

    pub fn available_refs(&self) -> usize {
        MAX_CELL_REFS - self.refs.len()
    }

    fn ensure_bits(&self, extra: usize) -> Result<(), CapacityError> {
        let requested = self.bits.len() + extra;
        if requested > MAX_CELL_BITS {
            Err(CapacityError::BitsExceeded {
                limit: MAX_CELL_BITS,
                requested,
            })
        } else {
            Ok(())
        }
    }

    fn ensure_refs(&self, extra: usize) -> Result<(), CapacityError> {
        if self.refs.len() + extra > MAX_CELL_REFS {
            Err(CapacityError::RefsExceeded {
                limit: MAX_CELL_REFS,
            })
        } else {
            Ok(())
        }
    }

    pub fn store_bit(&mut self, bit: bool) -> EncodeResult<&mut Self> {
        self.ensure_bits(1)?;
        self.bits.push_bit(bit);
        Ok(self)
    }

    /// Appends `value` as an unsigned big-endian integer of exactly `bits` bits.
    ///
    /// Fails with [`RangeError::Overflow`] if `value >= 2^bits`.
    pub fn store_uint(&mut self, value: u64, bits: u16) -> EncodeResult<&mut Self> {
        let actual_bits = (64 - value.leading_zeros()) as u64;
        if actual_bits > bits as u64 {
            return Err(RangeError::Overflow { bits, actual_bits }.into());
        }
        self.ensure_bits(bits as usize)?;
        self.bits.push_uint(value, bits);
        Ok(self)
    }

    /// Appends `value` in two's complement using exactly `bits` bits.
    pub fn store_int(&mut self, value: i64, bits: u16) -> EncodeResult<&mut Self> {
        let fits = match bits {
            0 => value == 0,
            1..=63 => {
                let bound = 1i64 << (bits - 1);
                (-bound..bound).contains(&value)
            }
            _ => true,
        };
        if !fits {
            return Err(RangeError::SignedOverflow { value, bits }.into());
        }
        self.ensure_bits(bits as usize)?;
        let width = bits as usize;
        if width > 64 {
            self.bits.push_repeat(value < 0, width - 64);
            self.bits.push_uint(value as u64, 64);
        } else {
            self.bits.push_uint(value as u64, bits);
        }
        Ok(self)
    }

    /// Appends an arbitrarily large unsigned integer using exactly `bits` bits.
    pub fn store_biguint(&mut self, value: &BigUint, bits: u16) -> EncodeResult<&mut Self> {
        let actual_bits = value.bits();
        if actual_bits > bits as u64 {
            return Err(RangeError::Overflow { bits, actual_bits }.into());
        }
        self.ensure_bits(bits as usize)?;
        push_biguint(&mut self.bits, value, bits as usize);
        Ok(self)
    }

    /// Appends a coin amount: a 4-bit byte length followed by the magnitude.
    pub fn store_coins(&mut self, coins: &Coins) -> EncodeResult<&mut Self> {
        let byte_len = coins.byte_len();
        if byte_len > MAX_COINS_BYTES {
            return Err(RangeError::CoinsOverflow { byte_len }.into());
        }
        self.ensure_bits(COINS_LEN_BITS as usize + byte_len * 8)?;
        self.bits.push_uint(byte_len as u64, COINS_LEN_BITS);
        push_biguint(&mut self.bits, coins.as_inner(), byte_len * 8);
        Ok(self)
    }

    /// Appends an address, or the two-bit `addr_none` tag when `None`.
    pub fn store_address(&mut self, address: Option<&Address>) -> EncodeResult<&mut Self> {
        match address {
            None => {
                self.ensure_bits(2)?;
                self.bits.push_uint(0b00, 2);
            }
            Some(addr) => {
                self.ensure_bits(Address::STD_BITS)?;
                addr.write_std(&mut self.bits);
            }
        }
        Ok(self)
    }

    /// Appends raw bytes; they must all fit in this cell.
    pub fn store_bytes(&mut self, bytes: &[u8]) -> EncodeResult<&mut Self> {
        self.ensure_bits(bytes.len() * 8)?;
        self.bits.push_all(bytes);
        Ok(self)
    }

    /// Appends the UTF-8 bytes of `s`, spilling whatever does not fit into a
    /// chain of referenced cells.
    pub fn store_string_tail(&mut self, s: &str) -> EncodeResult<&mut Self> {
        self.store_bytes_tail(s.as_bytes())
    }

    /// Byte-level version of [`store_string_tail`](Self::store_string_tail).
    pub fn store_bytes_tail(&mut self, bytes: &[u8]) -> EncodeResult<&mut Self> {
        let fits = self.available_bits() / 8;
        if bytes.len() <= fits {
            return self.store_bytes(bytes);
        }
        self.ensure_refs(1)?;
        let (head, rest) = bytes.split_at(fits);
        let mut next = CellBuilder::new();
        next.store_bytes_tail(rest)?;
        let next = next.build();
        self.bits.push_all(head);
        self.refs.push(next);
        Ok(self)
    }

    pub fn store_ref(&mut self, cell: Cell) -> EncodeResult<&mut Self> {
        self.ensure_refs(1)?;
        self.refs.push(cell);
        Ok(self)
    }

    /// Appends pre-assembled bits.
    pub fn store_bits(&mut self, bits: &BitString) -> EncodeResult<&mut Self> {
        self.ensure_bits(bits.len())?;
        self.bits.extend_bits(bits);
        Ok(self)
    }

    /// Appends the bits and references of `cell` inline, as if they had been
    /// stored into this builder directly.
    pub fn store_cell_contents(&mut self, cell: &Cell) -> EncodeResult<&mut Self> {
        self.ensure_bits(cell.bit_len())?;
        self.ensure_refs(cell.refs().len())?;
        self.bits.extend_bits(cell.bits());
        for r in cell.refs() {
            self.refs.push(r.clone());
        }
        Ok(self)
    }

    /// Appends a dictionary as `HashmapE`: a `0` bit when empty, otherwise a
    /// `1` bit and a reference to the root cell.
    pub fn store_dict<V: Store>(&mut self, dict: &Dictionary<V>) -> EncodeResult<&mut Self> {
        match dict.root_cell()? {
            None => self.store_bit(false),
            Some(root) => {
                self.ensure_bits(1)?;
                self.ensure_refs(1)?;
                self.bits.push_bit(true);
                self.refs.push(root);
                Ok(self)
            }
        }
    }

    /// Appends the root of a non-empty dictionary inline, without the
    /// presence bit.
    pub fn store_dict_direct<V: Store>(
        &mut self,
        dict: &Dictionary<V>,
    ) -> EncodeResult<&mut Self> {
        match dict.root_cell()? {
            None => Err(EncodeError::EmptyDictionary),
            Some(root) => self.store_cell_contents(&root),
        }
    }

    /// Appends any [`Store`] value.
    pub fn store<T: Store + ?Sized>(&mut self, value: &T) -> EncodeResult<&mut Self> {
        value.store_into(self)?;
        Ok(self)
    }

    /// Finalizes the accumulated contents into an immutable cell.
    pub fn build(self) -> Cell {
        Cell::finalize(self.bits, self.refs)
    }
}

/// Pushes `value` left-padded with zeros to `width` bits. `value.bits() <= width`.
fn push_biguint<T: Target>(tgt: &mut T, value: &BigUint, width: usize) -> usize {
    let significant = value.bits() as usize;
    tgt.push_repeat(false, width - significant);
    if significant > 0 {
        let bytes = value.to_bytes_be();
        let skip = bytes.len() * 8 - significant;
        for i in skip..bytes.len() * 8 {
            tgt.push_bit(bytes[i / 8] & (0x80 >> (i % 8)) != 0);
        }
    }
    width
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::EncodeError;

    #[test]
    fn uint_layout() {
        let mut b = CellBuilder::new();
        b.store_uint(1, 32).unwrap().store_uint(0x0102, 16).unwrap();
        let c = b.build();
        assert_eq!(c.data(), &[0, 0, 0, 1, 1, 2]);
    }

    #[test]
    fn uint_out_of_range() {
        let mut b = CellBuilder::new();
        let err = b.store_uint(4, 2).unwrap_err();
        assert_eq!(
            err,
            EncodeError::Range(RangeError::Overflow {
                bits: 2,
                actual_bits: 3
            })
        );
        assert_eq!(b.bits_used(), 0);
        assert!(b.store_uint(0, 0).is_ok());
        assert!(b.store_uint(1, 0).is_err());
        assert!(b.store_uint(u64::MAX, 64).is_ok());
    }

    #[test]
    fn wide_uint_is_zero_padded() {
        let mut b = CellBuilder::new();
        b.store_uint(1, 72).unwrap();
        let c = b.build();
        assert_eq!(c.data(), &[0, 0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn int_twos_complement() {
        let mut b = CellBuilder::new();
        b.store_int(-1, 8).unwrap().store_int(-128, 8).unwrap().store_int(127, 8).unwrap();
        assert_eq!(b.build().data(), &[0xff, 0x80, 0x7f]);

        let mut b = CellBuilder::new();
        assert!(b.store_int(128, 8).is_err());
        assert!(b.store_int(-129, 8).is_err());
        b.store_int(-1, 70).unwrap();
        assert_eq!(b.bits_used(), 70);
        assert!(b.build().bits().iter().all(|bit| bit));
    }

    #[test]
    fn zero_coins_is_four_zero_bits() {
        let mut b = CellBuilder::new();
        b.store_coins(&Coins::zero()).unwrap();
        let c = b.build();
        assert_eq!(c.bit_len(), 4);
        assert_eq!(c.data(), &[0x00]);
    }

    #[test]
    fn coins_length_prefix() {
        let mut b = CellBuilder::new();
        b.store_coins(&Coins::from(0x0100u64)).unwrap();
        let c = b.build();
        assert_eq!(c.bit_len(), 4 + 16);
        // 0010 0000 0001 0000 0000
        assert_eq!(c.data(), &[0x20, 0x10, 0x00]);
    }

    #[test]
    fn bit_capacity_exceeded() {
        let mut b = CellBuilder::new();
        for _ in 0..15 {
            b.store_uint(0, 64).unwrap();
        }
        b.store_uint(0, 63).unwrap();
        assert_eq!(b.available_bits(), 0);
        let err = b.store_bit(true).unwrap_err();
        assert_eq!(
            err,
            EncodeError::Capacity(CapacityError::BitsExceeded {
                limit: 1023,
                requested: 1024
            })
        );
        assert_eq!(b.bits_used(), 1023);
        assert_eq!(b.build().bit_len(), 1023);
    }

    #[test]
    fn fifth_ref_rejected() {
        let mut b = CellBuilder::new();
        for _ in 0..4 {
            b.store_ref(Cell::empty()).unwrap();
        }
        let err = b.store_ref(Cell::empty()).unwrap_err();
        assert_eq!(
            err,
            EncodeError::Capacity(CapacityError::RefsExceeded { limit: 4 })
        );
        assert_eq!(b.refs_used(), 4);
    }

    #[test]
    fn oversized_bytes_leave_builder_untouched() {
        let mut b = CellBuilder::new();
        b.store_uint(3, 8).unwrap();
        assert!(b.store_bytes(&[0u8; 128]).is_err());
        assert_eq!(b.bits_used(), 8);
    }

    #[test]
    fn string_tail_spills_into_refs() {
        let s = "a".repeat(300);
        let mut b = CellBuilder::new();
        b.store_string_tail(&s).unwrap();
        let c = b.build();
        assert_eq!(c.bit_len(), 127 * 8);
        let next = c.reference(0).unwrap();
        assert_eq!(next.bit_len(), 127 * 8);
        let last = next.reference(0).unwrap();
        assert_eq!(last.bit_len(), 46 * 8);
        assert!(last.refs().is_empty());
    }

    #[test]
    fn string_tail_needs_free_ref() {
        let mut b = CellBuilder::new();
        for _ in 0..4 {
            b.store_ref(Cell::empty()).unwrap();
        }
        b.store_string_tail("short").unwrap();
        assert!(b.store_string_tail(&"x".repeat(200)).is_err());
        assert_eq!(b.bits_used(), 40);
    }

    #[test]
    fn none_address_is_two_bits() {
        let mut b = CellBuilder::new();
        b.store_address(None).unwrap();
        assert_eq!(b.bits_used(), 2);
    }

    #[test]
    fn empty_dict_direct_rejected() {
        let dict = Dictionary::<u16>::new(16).unwrap();
        let mut b = CellBuilder::new();
        assert_eq!(
            b.store_dict_direct(&dict).unwrap_err(),
            EncodeError::EmptyDictionary
        );
        b.store_dict(&dict).unwrap();
        assert_eq!(b.bits_used(), 1);
        assert_eq!(b.refs_used(), 0);
    }
}
