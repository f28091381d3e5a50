//! Routing graph construction and the SDAL routing parcel encoder
//!: node/segment graph from line-strings, fixed-layout
//! headers, delta-coded node block, length-coded segment block.

pub mod encoder;
pub mod graph;
pub mod headers;

pub use encoder::{
    encode_nodes_block, encode_routing_parcel, encode_segments_block, partition_nodes,
    select_scale_shift, DEFAULT_SCALE_SHIFT, MAX_NODES_PER_PARTITION,
};
pub use graph::{build_graph, Node, RoadLineString, RoutingGraph, Segment};
pub use headers::DbRect;
