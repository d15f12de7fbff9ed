//! Sequential reader over a cell
//!
//! [`CellSlice`] is the read-side dual of
//! [`CellBuilder`](crate::builder::CellBuilder): it keeps a bit cursor and
//! a reference cursor into one cell and advances them as values are read.
//! Readers never modify the cell. Primitive reads (integers, coins,
//! addresses, bytes, references) leave both cursors where they were when
//! they fail; composite reads such as [`CellSlice::load_dict`] may not.

use num_bigint::BigUint;

use crate::address::Address;
use crate::cell::Cell;
use crate::coins::{Coins, COINS_LEN_BITS};
use crate::conv::Load;
use crate::dict::Dictionary;

pub mod error;

pub use error::{ParseError, ParseResult};

/// Cursor over the bits and references of a cell
#[derive(Clone, Debug)]
pub struct CellSlice<'a> {
    cell: &'a Cell,
    bit_pos: usize,
    ref_pos: usize,
}

impl<'a> CellSlice<'a> {
    pub fn new(cell: &'a Cell) -> Self {
        Self {
            cell,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len() - self.bit_pos
    }

    pub fn remaining_refs(&self) -> usize {
        self.cell.refs().len() - self.ref_pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0 && self.remaining_refs() == 0
    }

    /// Succeeds only if every bit and reference has been read.
    pub fn end_parse(&self) -> ParseResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ParseError::Leftover {
                bits: self.remaining_bits(),
                refs: self.remaining_refs(),
            })
        }
    }

    fn ensure_bits(&self, requested: usize) -> ParseResult<()> {
        let remaining = self.remaining_bits();
        if requested > remaining {
            Err(ParseError::NotEnoughBits {
                requested,
                remaining,
            })
        } else {
            Ok(())
        }
    }

    fn next_bit(&mut self) -> bool {
        // Callers check `ensure_bits` first; an out-of-range index reads as zero
        let bit = self.cell.bits().get(self.bit_pos).unwrap_or(false);
        self.bit_pos += 1;
        bit
    }

    pub fn skip_bits(&mut self, bits: usize) -> ParseResult<()> {
        self.ensure_bits(bits)?;
        self.bit_pos += bits;
        Ok(())
    }

    pub fn load_bit(&mut self) -> ParseResult<bool> {
        self.ensure_bits(1)?;
        Ok(self.next_bit())
    }

    /// Reads an unsigned big-endian integer of `bits <= 64` bits.
    pub fn load_uint(&mut self, bits: u16) -> ParseResult<u64> {
        if bits > 64 {
            return Err(ParseError::UnsupportedWidth { bits, max: 64 });
        }
        self.ensure_bits(bits as usize)?;
        let mut ret = 0u64;
        for _ in 0..bits {
            ret = (ret << 1) | self.next_bit() as u64;
        }
        Ok(ret)
    }

    /// Reads a two's complement integer of `bits <= 64` bits.
    pub fn load_int(&mut self, bits: u16) -> ParseResult<i64> {
        let raw = self.load_uint(bits)?;
        Ok(match bits {
            0 => 0,
            64 => raw as i64,
            _ => {
                let shift = 64 - bits as u32;
                ((raw << shift) as i64) >> shift
            }
        })
    }

    /// Reads an unsigned integer of arbitrary width.
    pub fn load_biguint(&mut self, bits: u16) -> ParseResult<BigUint> {
        let width = bits as usize;
        self.ensure_bits(width)?;
        let n_bytes = (width + 7) / 8;
        let pad = n_bytes * 8 - width;
        let mut bytes = vec![0u8; n_bytes];
        for i in pad..n_bytes * 8 {
            if self.next_bit() {
                bytes[i / 8] |= 0x80 >> (i % 8);
            }
        }
        Ok(BigUint::from_bytes_be(&bytes))
    }

    pub fn load_coins(&mut self) -> ParseResult<Coins> {
        let start = self.bit_pos;
        let byte_len = self.load_uint(COINS_LEN_BITS)? as u16;
        match self.load_biguint(byte_len * 8) {
            Ok(n) => Ok(Coins(n)),
            Err(err) => {
                self.bit_pos = start;
                Err(err)
            }
        }
    }

    /// Reads an `addr_std` (returned as `Some`) or `addr_none` (`None`).
    pub fn load_address(&mut self) -> ParseResult<Option<Address>> {
        let start = self.bit_pos;
        let ret = self.load_address_inner();
        if ret.is_err() {
            self.bit_pos = start;
        }
        ret
    }

    fn load_address_inner(&mut self) -> ParseResult<Option<Address>> {
        match self.load_uint(2)? {
            0b00 => Ok(None),
            0b10 => {
                self.ensure_bits(Address::STD_BITS - 2)?;
                if self.next_bit() {
                    return Err(ParseError::InvalidTag {
                        context: "addr_std anycast",
                        tag: 1,
                    });
                }
                let workchain = self.load_int(8)? as i8;
                let mut hash = [0u8; 32];
                for b in hash.iter_mut() {
                    *b = self.load_uint(8)? as u8;
                }
                Ok(Some(Address::new(workchain, hash)))
            }
            tag => Err(ParseError::InvalidTag {
                context: "MsgAddressInt",
                tag,
            }),
        }
    }

    pub fn load_bytes(&mut self, len: usize) -> ParseResult<Vec<u8>> {
        self.ensure_bits(len * 8)?;
        let mut ret = Vec::with_capacity(len);
        for _ in 0..len {
            let mut b = 0u8;
            for _ in 0..8 {
                b = (b << 1) | self.next_bit() as u8;
            }
            ret.push(b);
        }
        Ok(ret)
    }

    pub fn load_ref(&mut self) -> ParseResult<Cell> {
        let cell = self
            .cell
            .reference(self.ref_pos)
            .ok_or(ParseError::NotEnoughRefs)?
            .clone();
        self.ref_pos += 1;
        Ok(cell)
    }

    /// Reads all remaining whole bytes and, if a reference remains, keeps
    /// reading down the chain it starts.
    pub fn load_bytes_tail(&mut self) -> ParseResult<Vec<u8>> {
        let remaining = self.remaining_bits();
        if remaining % 8 != 0 {
            return Err(ParseError::NotEnoughBits {
                requested: remaining + 8 - remaining % 8,
                remaining,
            });
        }
        let mut ret = self.load_bytes(remaining / 8)?;
        let mut next = if self.remaining_refs() > 0 {
            Some(self.load_ref()?)
        } else {
            None
        };
        while let Some(cell) = next {
            let mut s = cell.as_slice();
            let rem = s.remaining_bits();
            if rem % 8 != 0 {
                return Err(ParseError::NotEnoughBits {
                    requested: rem + 8 - rem % 8,
                    remaining: rem,
                });
            }
            ret.extend(s.load_bytes(rem / 8)?);
            next = s.cell.reference(0).cloned();
        }
        Ok(ret)
    }

    pub fn load_string_tail(&mut self) -> ParseResult<String> {
        Ok(String::from_utf8(self.load_bytes_tail()?)?)
    }

    /// Reads a `HashmapE` with `key_bits`-wide keys.
    pub fn load_dict<V: Load>(&mut self, key_bits: u16) -> ParseResult<Dictionary<V>> {
        if self.load_bit()? {
            let root = self.load_ref()?;
            Dictionary::load_root(&root, key_bits)
        } else {
            Dictionary::new(key_bits).map_err(|_| ParseError::UnsupportedWidth {
                bits: key_bits,
                max: crate::dict::MAX_KEY_BITS,
            })
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::builder::CellBuilder;
    use crate::conv::Store;
    use proptest::prelude::*;

    #[test]
    fn read_past_end() {
        let mut b = CellBuilder::new();
        b.store_uint(5, 3).unwrap();
        let cell = b.build();
        let mut s = cell.as_slice();
        assert_eq!(
            s.load_uint(4),
            Err(ParseError::NotEnoughBits {
                requested: 4,
                remaining: 3
            })
        );
        assert_eq!(s.load_uint(3), Ok(5));
        assert_eq!(s.load_ref(), Err(ParseError::NotEnoughRefs));
        assert!(s.end_parse().is_ok());
    }

    #[test]
    fn signed_readback() {
        let mut b = CellBuilder::new();
        b.store_int(-5, 12).unwrap().store_int(7, 12).unwrap();
        let cell = b.build();
        let mut s = cell.as_slice();
        assert_eq!(s.load_int(12), Ok(-5));
        assert_eq!(s.load_int(12), Ok(7));
    }

    #[test]
    fn bytes_tail_follows_chain() {
        let text = "snake ".repeat(100);
        let mut b = CellBuilder::new();
        b.store_uint(9, 8).unwrap().store_string_tail(&text).unwrap();
        let cell = b.build();
        let mut s = cell.as_slice();
        assert_eq!(s.load_uint(8), Ok(9));
        assert_eq!(s.load_string_tail().unwrap(), text);
    }

    #[test]
    fn failed_address_read_restores_cursor() {
        let mut b = CellBuilder::new();
        b.store_uint(0b11, 2).unwrap();
        let cell = b.build();
        let mut s = cell.as_slice();
        assert!(s.load_address().is_err());
        assert_eq!(s.remaining_bits(), 2);
    }

    proptest! {
        #[test]
        fn uint_roundtrip(bits in 1u16..=64, raw in any::<u64>()) {
            let value = if bits == 64 { raw } else { raw & ((1u64 << bits) - 1) };
            let mut b = CellBuilder::new();
            b.store_uint(value, bits).unwrap();
            let cell = b.build();
            prop_assert_eq!(cell.bit_len(), bits as usize);
            let mut s = cell.as_slice();
            prop_assert_eq!(s.load_uint(bits).unwrap(), value);
            prop_assert!(s.end_parse().is_ok());
        }

        #[test]
        fn wide_uint_roundtrip(bits in 64u16..=256, raw in any::<u64>()) {
            let mut b = CellBuilder::new();
            b.store_uint(raw, bits).unwrap();
            let cell = b.build();
            let mut s = cell.as_slice();
            prop_assert_eq!(s.load_biguint(bits).unwrap(), BigUint::from(raw));
        }

        #[test]
        fn coins_roundtrip(hi in any::<u64>(), lo in any::<u64>()) {
            let amount = Coins::from(((hi as u128) << 56) ^ lo as u128);
            let cell = amount.to_cell().unwrap();
            let mut s = cell.as_slice();
            prop_assert_eq!(s.load_coins().unwrap(), amount);
        }
    }
}
