//! Growable bit buffer backing cell data
//!
//! [`BitString`] stores bits most-significant-first in a byte buffer,
//! the same order in which they appear on the wire. The final byte may be
//! partially filled; unused low bits are always kept at zero.

use std::fmt::{Debug, Display, Formatter};

use crate::conv::target::Target;

/// Number of bytes needed to hold the data of a full cell
pub const CELL_DATA_BYTES: usize = 128;

cfg_if::cfg_if! {
    if #[cfg(feature = "smallvec_bits")] {
        /// Storage used by [`BitString`]. With `smallvec_bits`, a full cell fits inline.
        type Inner = smallvec::SmallVec<[u8; CELL_DATA_BYTES]>;
    } else {
        /// Storage used by [`BitString`]. Without `smallvec_bits`, a plain vector.
        type Inner = Vec<u8>;
    }
}

/// Sequence of bits, most significant bit of each byte first
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bytes: Inner,
    len: usize,
}

impl BitString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits held
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the bit at position `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Underlying bytes; the trailing partial byte is zero-padded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Bytes with the completion tag applied: when the length is not a
    /// multiple of 8, a single `1` bit follows the data and the rest of the
    /// final byte is zero.
    pub fn padded_bytes(&self) -> Vec<u8> {
        let mut ret = self.bytes.to_vec();
        if self.len % 8 != 0 {
            if let Some(last) = ret.last_mut() {
                *last |= 0x80 >> (self.len % 8);
            }
        }
        ret
    }

    /// Appends every bit of `other`.
    pub fn extend_bits(&mut self, other: &BitString) -> usize {
        if self.len % 8 == 0 {
            self.bytes.extend_from_slice(&other.bytes);
            self.len += other.len;
        } else {
            for bit in other.iter() {
                self.push_bit(bit);
            }
        }
        other.len
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.bytes[i / 8] & (0x80 >> (i % 8)) != 0)
    }
}

impl Target for BitString {
    fn create() -> Self {
        Self::new()
    }

    fn push_bit(&mut self, bit: bool) -> usize {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        if bit {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 0x80 >> (self.len % 8);
        }
        self.len += 1;
        1
    }

    fn push_all(&mut self, buf: &[u8]) -> usize {
        if self.len % 8 == 0 {
            self.bytes.extend_from_slice(buf);
            self.len += buf.len() * 8;
        } else {
            for &b in buf {
                self.push_uint(b as u64, 8);
            }
        }
        buf.len() * 8
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut ret = Self::new();
        for bit in iter {
            ret.push_bit(bit);
        }
        ret
    }
}

/// Hexadecimal form in the `x{...}` convention: plain hex when the length is
/// a multiple of 4, otherwise completion-tagged hex followed by `_`.
impl Display for BitString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.len % 4 == 0 {
            let nibbles = self.len / 4;
            let s = hex::encode_upper(&self.bytes);
            f.write_str(&s[..nibbles])
        } else {
            let mut padded = self.clone();
            padded.push_bit(true);
            while padded.len % 4 != 0 {
                padded.push_bit(false);
            }
            let nibbles = padded.len / 4;
            let s = hex::encode_upper(&padded.bytes);
            write!(f, "{}_", &s[..nibbles])
        }
    }
}

impl Debug for BitString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BitString({}, {})", self.len, self)
    }
}
