//! Edge labels of the dictionary trie
//!
//! A label is a run of key bits shared by every key below an edge. With `m`
//! key bits still to be consumed, a label of length `n` can be written as
//!
//! ```text
//! hml_short  0 1^n 0 bits          2 + 2n bits
//! hml_long   10 n:(#<= m) bits      2 + w + n bits
//! hml_same   11 v n:(#<= m)         3 + w bits, only if all bits equal v
//! ```
//!
//! where `w = ceil(log2(m + 1))`. The shortest form wins; ties go to
//! `hml_short`, then `hml_long`.

use crate::conv::target::{BitCounter, Target};
use crate::slice::{CellSlice, ParseError, ParseResult};

/// Window of `len` bits of a `key_bits`-wide key, starting `offset` bits
/// from its most significant end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Label {
    pub key: u64,
    pub key_bits: u16,
    pub offset: u16,
    pub len: u16,
}

impl Label {
    pub fn bit(&self, i: u16) -> bool {
        key_bit(self.key, self.key_bits, self.offset + i)
    }

    fn is_same(&self) -> bool {
        (1..self.len).all(|i| self.bit(i) == self.bit(0))
    }
}

/// Bit `pos` of `key`, counting from the most significant of `key_bits` bits.
pub(crate) fn key_bit(key: u64, key_bits: u16, pos: u16) -> bool {
    (key >> (key_bits - 1 - pos)) & 1 == 1
}

/// Width of the length field for labels with `max_len` remaining key bits.
pub(crate) fn len_width(max_len: u16) -> u16 {
    (16 - max_len.leading_zeros()) as u16
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LabelKind {
    Short,
    Long,
    Same,
}

fn write_short<T: Target>(label: &Label, tgt: &mut T) -> usize {
    let mut n = tgt.push_bit(false);
    n += tgt.push_repeat(true, label.len as usize);
    n += tgt.push_bit(false);
    for i in 0..label.len {
        n += tgt.push_bit(label.bit(i));
    }
    n
}

fn write_long<T: Target>(label: &Label, max_len: u16, tgt: &mut T) -> usize {
    let mut n = tgt.push_uint(0b10, 2);
    n += tgt.push_uint(label.len as u64, len_width(max_len));
    for i in 0..label.len {
        n += tgt.push_bit(label.bit(i));
    }
    n
}

fn write_same<T: Target>(label: &Label, max_len: u16, tgt: &mut T) -> usize {
    tgt.push_uint(0b11, 2)
        + tgt.push_bit(label.len > 0 && label.bit(0))
        + tgt.push_uint(label.len as u64, len_width(max_len))
}

fn measure(f: impl FnOnce(&mut BitCounter) -> usize) -> usize {
    let mut counter = BitCounter::create();
    f(&mut counter);
    counter.count()
}

fn choose(label: &Label, max_len: u16) -> LabelKind {
    let mut kind = LabelKind::Short;
    let mut best = measure(|c| write_short(label, c));
    let long = measure(|c| write_long(label, max_len, c));
    if long < best {
        kind = LabelKind::Long;
        best = long;
    }
    if label.is_same() && measure(|c| write_same(label, max_len, c)) < best {
        kind = LabelKind::Same;
    }
    kind
}

/// Writes `label` in its shortest form given `max_len` remaining key bits.
pub(crate) fn write_label<T: Target>(label: &Label, max_len: u16, tgt: &mut T) -> usize {
    match choose(label, max_len) {
        LabelKind::Short => write_short(label, tgt),
        LabelKind::Long => write_long(label, max_len, tgt),
        LabelKind::Same => write_same(label, max_len, tgt),
    }
}

/// Reads a label of any form, returning its bits right-aligned and its length.
pub(crate) fn read_label(slice: &mut CellSlice<'_>, max_len: u16) -> ParseResult<(u64, u16)> {
    let (bits, len) = if !slice.load_bit()? {
        let mut len = 0u16;
        while slice.load_bit()? {
            len += 1;
            if len > max_len {
                return Err(ParseError::InvalidLabel {
                    remaining: max_len,
                    len,
                });
            }
        }
        (slice.load_uint(len)?, len)
    } else if !slice.load_bit()? {
        let len = slice.load_uint(len_width(max_len))? as u16;
        check_len(len, max_len)?;
        (slice.load_uint(len)?, len)
    } else {
        let v = slice.load_bit()?;
        let len = slice.load_uint(len_width(max_len))? as u16;
        check_len(len, max_len)?;
        let bits = match (v, len) {
            (false, _) | (true, 0) => 0,
            (true, 64) => u64::MAX,
            (true, n) => (1u64 << n) - 1,
        };
        (bits, len)
    };
    Ok((bits, len))
}

fn check_len(len: u16, max_len: u16) -> ParseResult<()> {
    if len > max_len {
        Err(ParseError::InvalidLabel {
            remaining: max_len,
            len,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bits::BitString;

    fn label(key: u64, key_bits: u16, offset: u16, len: u16) -> Label {
        Label {
            key,
            key_bits,
            offset,
            len,
        }
    }

    fn written(l: &Label, max_len: u16) -> String {
        let mut bits = BitString::new();
        write_label(l, max_len, &mut bits);
        bits.iter().map(|b| if b { '1' } else { '0' }).collect()
    }

    #[test]
    fn length_field_width() {
        assert_eq!(len_width(0), 0);
        assert_eq!(len_width(1), 1);
        assert_eq!(len_width(2), 2);
        assert_eq!(len_width(3), 2);
        assert_eq!(len_width(4), 3);
        assert_eq!(len_width(16), 5);
        assert_eq!(len_width(64), 7);
    }

    #[test]
    fn empty_label_is_short() {
        assert_eq!(written(&label(0, 16, 0, 0), 16), "00");
    }

    #[test]
    fn uniform_label_is_same() {
        // 16 zero bits: short = 34, long = 23, same = 8
        assert_eq!(written(&label(0, 16, 0, 16), 16), "11010000");
    }

    #[test]
    fn mixed_label_prefers_long() {
        // 1010_1010_1010_1010: short = 34, long = 2 + 5 + 16 = 23
        assert_eq!(
            written(&label(0xaaaa, 16, 0, 16), 16),
            "10100001010101010101010"
        );
    }

    #[test]
    fn short_label_ties_go_short() {
        // one bit `1` of 3 remaining: short = 4, long = 2 + 2 + 1 = 5, same = 5
        assert_eq!(written(&label(0b100, 3, 0, 1), 3), "0101");
    }

    #[test]
    fn read_back_every_form() {
        for (l, max_len) in [
            (label(0, 16, 0, 0), 16),
            (label(0, 16, 0, 16), 16),
            (label(0xffff, 16, 0, 16), 16),
            (label(0xaaaa, 16, 0, 16), 16),
            (label(0b101, 3, 1, 2), 2),
            (label(u64::MAX, 64, 0, 64), 64),
        ] {
            let mut b = crate::builder::CellBuilder::new();
            let mut bits = BitString::new();
            write_label(&l, max_len, &mut bits);
            b.store_bits(&bits).unwrap();
            let cell = b.build();
            let mut s = cell.as_slice();
            let (v, len) = read_label(&mut s, max_len).unwrap();
            assert_eq!(len, l.len);
            let expected = (0..l.len).fold(0u64, |acc, i| (acc << 1) | l.bit(i) as u64);
            assert_eq!(v, expected);
            assert!(s.end_parse().is_ok());
        }
    }
}
