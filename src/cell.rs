//! Immutable tree nodes
//!
//! A [`Cell`] holds up to [`MAX_CELL_BITS`] bits of data and up to
//! [`MAX_CELL_REFS`] references to other cells. Cells are produced only by
//! [`CellBuilder::build`](crate::builder::CellBuilder::build), never mutated
//! afterwards, and cheap to clone: the same cell may be referenced from many
//! parents and shared across threads.
//!
//! # Hashing
//!
//! The representation hash of an ordinary cell is the SHA-256 digest of
//!
//! ```text
//! d1 d2 data* depth(ref)* hash(ref)*
//! ```
//!
//! where `d1` is the number of references, `d2` is `floor(bits / 8) + ceil(bits / 8)`,
//! `data` is completion-tagged (see [`BitString::padded_bytes`]), and each
//! reference contributes its depth as a big-endian `u16` followed, after all
//! depths, by its hash. Both hash and depth are computed once, at build time.

use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use arrayvec::ArrayVec;
use sha2::{Digest, Sha256};

use crate::bits::BitString;
use crate::slice::CellSlice;

/// Maximum number of data bits in one cell
pub const MAX_CELL_BITS: usize = 1023;

/// Maximum number of references in one cell
pub const MAX_CELL_REFS: usize = 4;

/// 256-bit representation hash
pub type CellHash = [u8; 32];

/// Bounded list of child references
pub type CellRefs = ArrayVec<Cell, MAX_CELL_REFS>;

struct CellInner {
    bits: BitString,
    refs: CellRefs,
    hash: CellHash,
    depth: u16,
}

/// Shared handle to an immutable cell
#[derive(Clone)]
pub struct Cell(Arc<CellInner>);

lazy_static::lazy_static! {
    static ref EMPTY_CELL: Cell = Cell::finalize(BitString::new(), CellRefs::new());
}

impl Cell {
    /// Freezes `bits` and `refs` into a cell, computing depth and hash.
    ///
    /// Capacity is enforced by the builder before this point.
    pub(crate) fn finalize(bits: BitString, refs: CellRefs) -> Self {
        debug_assert!(bits.len() <= MAX_CELL_BITS);
        let depth = refs
            .iter()
            .map(|r| r.depth() + 1)
            .max()
            .unwrap_or(0);

        let mut hasher = Sha256::new();
        hasher.update(descriptors(&bits, refs.len()));
        hasher.update(bits.padded_bytes());
        for r in refs.iter() {
            hasher.update(r.depth().to_be_bytes());
        }
        for r in refs.iter() {
            hasher.update(r.repr_hash());
        }
        let hash: CellHash = hasher.finalize().into();

        Self(Arc::new(CellInner {
            bits,
            refs,
            hash,
            depth,
        }))
    }

    /// Returns a shared handle to the cell with no bits and no references.
    pub fn empty() -> Self {
        EMPTY_CELL.clone()
    }

    pub fn bits(&self) -> &BitString {
        &self.0.bits
    }

    /// Data size in bits
    pub fn bit_len(&self) -> usize {
        self.0.bits.len()
    }

    /// Raw data bytes; a trailing partial byte is zero-padded.
    pub fn data(&self) -> &[u8] {
        self.0.bits.as_bytes()
    }

    pub fn refs(&self) -> &[Cell] {
        &self.0.refs
    }

    /// Returns the `index`-th child, if present.
    pub fn reference(&self, index: usize) -> Option<&Cell> {
        self.0.refs.get(index)
    }

    pub fn repr_hash(&self) -> &CellHash {
        &self.0.hash
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.0.hash)
    }

    pub fn depth(&self) -> u16 {
        self.0.depth
    }

    /// The two descriptor bytes that prefix this cell in hashes and bags of cells.
    pub fn descriptors(&self) -> [u8; 2] {
        descriptors(&self.0.bits, self.0.refs.len())
    }

    pub fn is_empty(&self) -> bool {
        self.0.bits.is_empty() && self.0.refs.is_empty()
    }

    /// Opens a reader positioned at the start of this cell.
    pub fn as_slice(&self) -> CellSlice<'_> {
        CellSlice::new(self)
    }

    fn fmt_tree(&self, f: &mut Formatter<'_>, indent: usize) -> std::fmt::Result {
        writeln!(f, "{:indent$}x{{{}}}", "", self.0.bits, indent = indent)?;
        for r in self.refs() {
            r.fmt_tree(f, indent + 1)?;
        }
        Ok(())
    }
}

fn descriptors(bits: &BitString, refs: usize) -> [u8; 2] {
    let len = bits.len();
    let d2 = len / 8 + (len + 7) / 8;
    // Fits: refs <= 4 and d2 <= 255 for len <= 1023
    [refs as u8, d2 as u8]
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.hash == other.0.hash
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash.hash(state)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

impl Debug for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cell {{ bits: {}, refs: {}, hash: {} }}",
            self.bit_len(),
            self.refs().len(),
            self.hash_hex()
        )
    }
}

/// Multi-line tree form: each cell as `x{HEX}`, children indented by one space.
impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_tree(f, 0)
    }
}
