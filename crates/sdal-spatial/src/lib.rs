//! Spatial structures that back the KD-tree and B-tree payload encoders:
//! a balanced-median-split KD-tree builder and an order-tracked B+-tree
//! ordered map.

pub mod btree;
pub mod kdtree;

pub use btree::{serialize_btree_payload, BPlusTree, NODE_ORDER};
pub use kdtree::{build_kdtree, serialize_kdtree, PoiPoint};
