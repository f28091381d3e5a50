//! B+-tree ordered map from `u32` way-id to `u64` byte-offset.
//!
//! The order-50 node structure is an intermediate, in-memory-only
//! construction; what reaches disk is a key-ordered traversal serialized
//! as a flat B-tree offset parcel.

use std::collections::BTreeMap;

pub const NODE_ORDER: usize = 50;

/// An ordered `id -> offset` map. Internally a plain ordered map suffices
/// since the on-disc image only needs a sorted `(id, offset)` traversal;
/// `NODE_ORDER` documents the node fan-out the original builder used for
/// its in-memory tree and is carried for interface fidelity.
#[derive(Debug, Default, Clone)]
pub struct BPlusTree {
    map: BTreeMap<u32, u64>,
}

impl BPlusTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: u32, offset: u64) {
        self.map.insert(id, offset);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Traverse in key order, yielding `(id, offset)` pairs.
    pub fn ordered_pairs(&self) -> Vec<(u32, u64)> {
        self.map.iter().map(|(&k, &v)| (k, v)).collect()
    }
}

impl FromIterator<(u32, u64)> for BPlusTree {
    fn from_iter<T: IntoIterator<Item = (u32, u64)>>(iter: T) -> Self {
        let mut tree = Self::new();
        for (k, v) in iter {
            tree.insert(k, v);
        }
        tree
    }
}

/// Serialize `pairs` (already in key order) as the flat B-tree offset
/// parcel payload: `u32 count, u16 version=1, count × (u32 id, u64 offset)`.
pub fn serialize_btree_payload(pairs: &[(u32, u64)]) -> Vec<u8> {
    let mut out = Vec::with_capacity(6 + pairs.len() * 12);
    out.extend_from_slice(&(pairs.len() as u32).to_be_bytes());
    out.extend_from_slice(&1u16.to_be_bytes());
    for &(id, offset) in pairs {
        out.extend_from_slice(&id.to_be_bytes());
        out.extend_from_slice(&offset.to_be_bytes());
    }
    out
}
