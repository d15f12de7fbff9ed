//! Arena-backed binary trie over fixed-width keys
//!
//! Nodes live in a flat `Vec` and refer to their children by [`NodeId`].
//! Each node carries the label of the edge leading into it; a leaf consumes
//! the rest of its key, and a fork splits on the single bit following its
//! label, with the `0` branch on the left.
//!
//! The shape depends only on the key set: keys are processed in ascending
//! order, the label of a subtree is the common prefix of its smallest and
//! largest key, and the split point is found by binary search.

use super::label::{key_bit, Label};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Leaf { key: u64 },
    Fork { left: NodeId, right: NodeId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TrieNode {
    pub label: Label,
    pub kind: NodeKind,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Trie {
    nodes: Vec<TrieNode>,
    root: Option<NodeId>,
}

impl Trie {
    /// Builds the trie for `keys`, which must be sorted, unique, and fit in `key_bits`.
    pub fn build(keys: &[u64], key_bits: u16) -> Self {
        let mut trie = Self {
            nodes: Vec::with_capacity(keys.len().saturating_mul(2)),
            root: None,
        };
        if !keys.is_empty() {
            let root = trie.build_node(keys, key_bits, 0);
            trie.root = Some(root);
        }
        trie
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    fn push(&mut self, node: TrieNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn build_node(&mut self, keys: &[u64], key_bits: u16, offset: u16) -> NodeId {
        let first = keys[0];
        if keys.len() == 1 {
            return self.push(TrieNode {
                label: Label {
                    key: first,
                    key_bits,
                    offset,
                    len: key_bits - offset,
                },
                kind: NodeKind::Leaf { key: first },
            });
        }

        let last = keys[keys.len() - 1];
        let mut len = 0;
        while key_bit(first, key_bits, offset + len) == key_bit(last, key_bits, offset + len) {
            len += 1;
        }
        let split_at = offset + len;
        let mid = keys.partition_point(|&k| !key_bit(k, key_bits, split_at));

        let left = self.build_node(&keys[..mid], key_bits, split_at + 1);
        let right = self.build_node(&keys[mid..], key_bits, split_at + 1);
        self.push(TrieNode {
            label: Label {
                key: first,
                key_bits,
                offset,
                len,
            },
            kind: NodeKind::Fork { left, right },
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_has_no_root() {
        let t = Trie::build(&[], 16);
        assert!(t.root().is_none());
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn single_key_is_leaf_with_full_label() {
        let t = Trie::build(&[5], 16);
        let root = t.node(t.root().unwrap());
        assert_eq!(root.label.len, 16);
        assert_eq!(root.kind, NodeKind::Leaf { key: 5 });
    }

    #[test]
    fn fork_on_first_difference() {
        // 0b0001 and 0b0011 share `00`, split on the third bit
        let t = Trie::build(&[0b0001, 0b0011], 4);
        let root = t.node(t.root().unwrap());
        assert_eq!(root.label.len, 2);
        match root.kind {
            NodeKind::Fork { left, right } => {
                let l = t.node(left);
                let r = t.node(right);
                assert_eq!(l.kind, NodeKind::Leaf { key: 0b0001 });
                assert_eq!(r.kind, NodeKind::Leaf { key: 0b0011 });
                assert_eq!((l.label.offset, l.label.len), (3, 1));
                assert_eq!((r.label.offset, r.label.len), (3, 1));
            }
            _ => panic!("expected fork"),
        }
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn node_count_is_two_n_minus_one() {
        let keys: Vec<u64> = (0..250).map(|i| i * 3 + 1).collect();
        let t = Trie::build(&keys, 64);
        assert_eq!(t.len(), 2 * keys.len() - 1);
    }
}
