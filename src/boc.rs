//! Bag-of-cells serialization
//!
//! A finished tree is handed to wallets and RPC endpoints as a *bag of
//! cells*: a flat list of distinct cells, each followed by the indices of
//! its children. Only the plain single-root form is produced here:
//!
//! ```text
//! b5ee9c72 flags:u8 off_bytes:u8
//! cells:size roots:size absent:size total_cells_size:off
//! root_index:size
//! { d1 d2 data ref_index:size* }*
//! ```
//!
//! where `flags` carries no index, no CRC and the width `size` in its low
//! three bits. Cells are deduplicated by hash and every parent precedes its
//! children.

use std::collections::{HashMap, HashSet};

use base64::Engine;

use crate::cell::{Cell, CellHash};

pub const BOC_MAGIC: [u8; 4] = [0xb5, 0xee, 0x9c, 0x72];

struct Bag {
    order: Vec<Cell>,
    seen: HashSet<CellHash>,
}

impl Bag {
    fn visit(&mut self, cell: &Cell) {
        if !self.seen.insert(*cell.repr_hash()) {
            return;
        }
        for r in cell.refs() {
            self.visit(r);
        }
        self.order.push(cell.clone());
    }
}

/// Minimal number of bytes needed to write `n`, at least one
fn byte_width(n: usize) -> usize {
    let bits = usize::BITS - n.leading_zeros();
    std::cmp::max(1, ((bits + 7) / 8) as usize)
}

fn push_sized(out: &mut Vec<u8>, value: usize, width: usize) {
    let bytes = (value as u64).to_be_bytes();
    out.extend_from_slice(&bytes[8 - width..]);
}

/// Serializes the tree under `root` as a bag of cells.
pub fn serialize_boc(root: &Cell) -> Vec<u8> {
    let mut bag = Bag {
        order: Vec::new(),
        seen: HashSet::new(),
    };
    bag.visit(root);
    // postorder reversed: parents first, root at index 0
    bag.order.reverse();

    let index: HashMap<CellHash, usize> = bag
        .order
        .iter()
        .enumerate()
        .map(|(i, c)| (*c.repr_hash(), i))
        .collect();

    let size_bytes = byte_width(bag.order.len());
    let mut cells = Vec::new();
    for cell in bag.order.iter() {
        cells.extend_from_slice(&cell.descriptors());
        cells.extend_from_slice(&cell.bits().padded_bytes());
        for r in cell.refs() {
            push_sized(&mut cells, index[r.repr_hash()], size_bytes);
        }
    }
    let off_bytes = byte_width(cells.len());

    let mut out = Vec::with_capacity(4 + 2 + 4 * size_bytes + off_bytes + cells.len());
    out.extend_from_slice(&BOC_MAGIC);
    out.push(size_bytes as u8);
    out.push(off_bytes as u8);
    push_sized(&mut out, bag.order.len(), size_bytes);
    push_sized(&mut out, 1, size_bytes);
    push_sized(&mut out, 0, size_bytes);
    push_sized(&mut out, cells.len(), off_bytes);
    push_sized(&mut out, 0, size_bytes);
    out.extend_from_slice(&cells);

    tracing::trace!(
        cells = bag.order.len(),
        bytes = out.len(),
        root = %root.hash_hex(),
        "serialized bag of cells"
    );
    out
}

pub fn boc_to_hex(root: &Cell) -> String {
    hex::encode(serialize_boc(root))
}

pub fn boc_to_base64(root: &Cell) -> String {
    base64::engine::general_purpose::STANDARD.encode(serialize_boc(root))
}
