//! Dictionaries keyed by fixed-width unsigned integers
//!
//! A [`Dictionary<V>`] maps `key_bits`-wide keys (1 to 64 bits) to values
//! that know how to [`Store`] themselves. Its cell form is the canonical
//! `Hashmap` layout: a binary trie over key bits in which each edge carries a
//! label (see [`label`]) and each leaf holds its value right after the label,
//! while forks keep their two subtrees in references 0 and 1.
//!
//! Insertion order never matters. Entries are held sorted, the trie is built
//! from the sorted keys (see [`trie`]), and two dictionaries with the same
//! entries always serialize to identical cells.
//!
//! Inserting a key twice is an error rather than an overwrite.

use std::collections::BTreeMap;

use crate::builder::CellBuilder;
use crate::cell::Cell;
use crate::conv::target::Target;
use crate::conv::{Load, Store};
use crate::bits::BitString;
use crate::error::{DuplicateKeyError, EncodeResult, RangeError};
use crate::slice::{CellSlice, ParseError, ParseResult};

pub(crate) mod label;
pub(crate) mod trie;

use self::label::{read_label, write_label};
use self::trie::{NodeId, NodeKind, Trie};

/// Widest key a dictionary supports
pub const MAX_KEY_BITS: u16 = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dictionary<V> {
    key_bits: u16,
    entries: BTreeMap<u64, V>,
}

impl<V> Dictionary<V> {
    /// Creates an empty dictionary with `key_bits`-wide keys.
    pub fn new(key_bits: u16) -> EncodeResult<Self> {
        if key_bits == 0 || key_bits > MAX_KEY_BITS {
            return Err(RangeError::UnsupportedWidth {
                bits: key_bits,
                max: MAX_KEY_BITS,
            }
            .into());
        }
        Ok(Self {
            key_bits,
            entries: BTreeMap::new(),
        })
    }

    /// Collects `entries` into a new dictionary, failing on the first
    /// out-of-range or repeated key.
    pub fn from_entries<I>(key_bits: u16, entries: I) -> EncodeResult<Self>
    where
        I: IntoIterator<Item = (u64, V)>,
    {
        let mut dict = Self::new(key_bits)?;
        for (key, value) in entries {
            dict.insert(key, value)?;
        }
        Ok(dict)
    }

    pub fn key_bits(&self) -> u16 {
        self.key_bits
    }

    /// Adds a new entry.
    ///
    /// Fails with [`RangeError::Overflow`] if `key` does not fit in the key
    /// width, and with [`DuplicateKeyError`] if `key` is already present; in
    /// both cases the dictionary is left unchanged.
    pub fn insert(&mut self, key: u64, value: V) -> EncodeResult<()> {
        let actual_bits = (64 - key.leading_zeros()) as u64;
        if actual_bits > self.key_bits as u64 {
            return Err(RangeError::Overflow {
                bits: self.key_bits,
                actual_bits,
            }
            .into());
        }
        match self.entries.entry(key) {
            std::collections::btree_map::Entry::Occupied(_) => {
                Err(DuplicateKeyError { key }.into())
            }
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
        }
    }

    pub fn get(&self, key: u64) -> Option<&V> {
        self.entries.get(&key)
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.keys().copied()
    }
}

impl<V: Store> Dictionary<V> {
    /// Serializes the trie, returning `None` for an empty dictionary.
    pub fn root_cell(&self) -> EncodeResult<Option<Cell>> {
        let keys: Vec<u64> = self.entries.keys().copied().collect();
        let trie = Trie::build(&keys, self.key_bits);
        tracing::trace!(
            entries = keys.len(),
            key_bits = self.key_bits,
            nodes = trie.len(),
            "serializing dictionary"
        );
        match trie.root() {
            None => Ok(None),
            Some(root) => {
                let mut builder = CellBuilder::new();
                self.write_node(&trie, root, self.key_bits, &mut builder)?;
                Ok(Some(builder.build()))
            }
        }
    }

    fn write_node(
        &self,
        trie: &Trie,
        id: NodeId,
        max_len: u16,
        builder: &mut CellBuilder,
    ) -> EncodeResult<()> {
        let node = trie.node(id);
        let mut label_bits = BitString::create();
        write_label(&node.label, max_len, &mut label_bits);
        builder.store_bits(&label_bits)?;

        match node.kind {
            NodeKind::Leaf { key } => match self.entries.get(&key) {
                Some(value) => value.store_into(builder),
                // Every leaf is built from a key of `entries`
                None => unreachable!("trie leaf without entry"),
            },
            NodeKind::Fork { left, right } => {
                let rest = max_len - node.label.len - 1;
                let mut lb = CellBuilder::new();
                self.write_node(trie, left, rest, &mut lb)?;
                let mut rb = CellBuilder::new();
                self.write_node(trie, right, rest, &mut rb)?;
                builder.store_ref(lb.build())?.store_ref(rb.build())?;
                Ok(())
            }
        }
    }
}

impl<V: Load> Dictionary<V> {
    /// Reads a dictionary from its (non-empty) root cell.
    pub fn load_root(root: &Cell, key_bits: u16) -> ParseResult<Self> {
        let mut dict = Self::new(key_bits).map_err(|_| ParseError::UnsupportedWidth {
            bits: key_bits,
            max: MAX_KEY_BITS,
        })?;
        let mut slice = root.as_slice();
        dict.read_node(&mut slice, key_bits, 0)?;
        Ok(dict)
    }

    fn read_node(&mut self, slice: &mut CellSlice<'_>, max_len: u16, prefix: u64) -> ParseResult<()> {
        let (bits, len) = read_label(slice, max_len)?;
        let prefix = if len == 64 { bits } else { (prefix << len) | bits };
        let rest = max_len - len;
        if rest == 0 {
            let value = V::load_from(slice)?;
            self.entries.insert(prefix, value);
            return Ok(());
        }
        let left = slice.load_ref()?;
        let right = slice.load_ref()?;
        self.read_node(&mut left.as_slice(), rest - 1, prefix << 1)?;
        self.read_node(&mut right.as_slice(), rest - 1, (prefix << 1) | 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::EncodeError;
    use proptest::prelude::*;

    #[test]
    fn key_width_bounds() {
        assert!(Dictionary::<u16>::new(0).is_err());
        assert!(Dictionary::<u16>::new(65).is_err());
        assert!(Dictionary::<u16>::new(64).is_ok());
    }

    #[test]
    fn key_out_of_range() {
        let mut d = Dictionary::<u16>::new(16).unwrap();
        assert_eq!(
            d.insert(0x1_0000, 1),
            Err(EncodeError::Range(RangeError::Overflow {
                bits: 16,
                actual_bits: 17
            }))
        );
        assert!(d.is_empty());
    }

    #[test]
    fn duplicate_key_rejected() {
        let mut d = Dictionary::<u16>::new(16).unwrap();
        d.insert(7, 1).unwrap();
        assert_eq!(
            d.insert(7, 2),
            Err(EncodeError::DuplicateKey(DuplicateKeyError { key: 7 }))
        );
        assert_eq!(d.get(7), Some(&1));
    }

    #[test]
    fn empty_dictionary_has_no_root() {
        let d = Dictionary::<u16>::new(16).unwrap();
        assert_eq!(d.root_cell().unwrap(), None);
    }

    #[test]
    fn single_entry_layout() {
        // key 1 of 16 bits: long label `10 10000 0000000000000001` (23 bits) beats
        // short (34), then the 16-bit value
        let d = Dictionary::from_entries(16, [(1u64, 0xbeefu16)]).unwrap();
        let root = d.root_cell().unwrap().unwrap();
        assert_eq!(root.bit_len(), 23 + 16);
        assert!(root.refs().is_empty());
        let mut s = root.as_slice();
        assert_eq!(s.load_uint(2), Ok(0b10));
        assert_eq!(s.load_uint(5), Ok(16));
        assert_eq!(s.load_uint(16), Ok(1));
        assert_eq!(s.load_uint(16), Ok(0xbeef));
    }

    #[test]
    fn two_entries_fork() {
        let d = Dictionary::from_entries(16, [(0u64, 1u16), (0x8000, 2)]).unwrap();
        let root = d.root_cell().unwrap().unwrap();
        // empty label, then two children
        assert_eq!(root.bit_len(), 2);
        assert_eq!(root.refs().len(), 2);
        let back: Dictionary<u16> = Dictionary::load_root(&root, 16).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn full_width_keys_roundtrip() {
        let d = Dictionary::from_entries(64, [(0u64, 1u8), (u64::MAX, 2), (1 << 63, 3)]).unwrap();
        let root = d.root_cell().unwrap().unwrap();
        let back: Dictionary<u8> = Dictionary::load_root(&root, 64).unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn store_and_load_hashmap_e() {
        let d = Dictionary::from_entries(16, (0..20u64).map(|k| (k * 17, k as u16))).unwrap();
        let mut b = CellBuilder::new();
        b.store_dict(&d).unwrap();
        let cell = b.build();
        assert_eq!(cell.bit_len(), 1);
        let back: Dictionary<u16> = cell.as_slice().load_dict(16).unwrap();
        assert_eq!(back, d);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn insertion_order_is_irrelevant(
            keys in proptest::collection::btree_set(any::<u16>(), 1..80),
            seed in any::<u64>(),
        ) {
            let forward: Vec<u64> = keys.iter().map(|k| *k as u64).collect();
            let mut shuffled = forward.clone();
            // deterministic shuffle driven by `seed`
            let mut state = seed | 1;
            for i in (1..shuffled.len()).rev() {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                shuffled.swap(i, (state % (i as u64 + 1)) as usize);
            }

            let a = Dictionary::from_entries(16, forward.iter().map(|k| (*k, *k as u32))).unwrap();
            let b = Dictionary::from_entries(16, shuffled.iter().map(|k| (*k, *k as u32))).unwrap();
            let ca = a.root_cell().unwrap().unwrap();
            let cb = b.root_cell().unwrap().unwrap();
            prop_assert_eq!(ca.repr_hash(), cb.repr_hash());

            let back: Dictionary<u32> = Dictionary::load_root(&ca, 16).unwrap();
            prop_assert_eq!(back, a);
        }
    }
}
