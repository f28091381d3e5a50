//! Routing parcel encoding: node block, segment block, scale-shift
//! selection, and chunking.
//!
//! Node-block dialect: this implementation fixes the scale-shifted,
//! signed-Type-5-delta-from-previous-node variant (not the anchor-based
//! Type-4 unsigned variant) — see §9's note that the source carries two
//! incompatible dialects and implementers must commit to one.

use sdal_types::{encode_type1, to_ntu, BitWriter, SdalResult};

use crate::graph::{Node, Segment};
use crate::headers::{encode_block_offset_array, encode_routing_hdr0, encode_sptl_pcl_hdr, DbRect};

pub const NODES_BLOCK_ID: u16 = 0x0100;
pub const SEGMENTS_BLOCK_ID: u16 = 0x0200;
pub const MAX_NODES_PER_PARTITION: usize = 1_000;

/// Default scale shift; sufficient for regional extracts.
pub const DEFAULT_SCALE_SHIFT: u8 = 12;

/// Signed-Type-5 magnitude ceiling: 18 magnitude bits (19-bit field minus
/// the sign bit).
const TYPE5_MAX_MAGNITUDE: i64 = (1i64 << 18) - 1;

/// Smallest `s` such that every consecutive-node NTU delta, shifted right
/// by `s`, still fits the Type-5 19-bit signed field. Falls back to
/// [`DEFAULT_SCALE_SHIFT`] when that already suffices.
pub fn select_scale_shift(nodes: &[Node]) -> u8 {
    let mut max_delta = 0i64;
    let mut prev: Option<(i32, i32)> = None;
    for n in nodes {
        let (lat, lon) = (to_ntu(n.lat_deg), to_ntu(n.lon_deg));
        if let Some((plat, plon)) = prev {
            max_delta = max_delta.max((lat as i64 - plat as i64).abs());
            max_delta = max_delta.max((lon as i64 - plon as i64).abs());
        }
        prev = Some((lat, lon));
    }

    if (max_delta >> DEFAULT_SCALE_SHIFT) <= TYPE5_MAX_MAGNITUDE {
        return DEFAULT_SCALE_SHIFT;
    }
    for s in 0u8..=31 {
        if (max_delta >> s) <= TYPE5_MAX_MAGNITUDE {
            return s;
        }
    }
    31
}

/// Encode the `NodesBlock` for one partition of nodes (already in ID
/// order): `BlkDesc || anchor lat/lon NTU || per-node Type-1 id + two
/// Type-5 signed deltas from the previous node`.
pub fn encode_nodes_block(nodes: &[Node], scale_shift: u8) -> SdalResult<Vec<u8>> {
    let mut desc = Vec::with_capacity(6);
    desc.extend_from_slice(&NODES_BLOCK_ID.to_be_bytes());
    desc.extend_from_slice(&(nodes.len() as u32).to_be_bytes());

    let (anchor_lat, anchor_lon) = nodes
        .first()
        .map(|n| (to_ntu(n.lat_deg), to_ntu(n.lon_deg)))
        .unwrap_or((0, 0));
    desc.extend_from_slice(&anchor_lat.to_be_bytes());
    desc.extend_from_slice(&anchor_lon.to_be_bytes());

    let mut bw = BitWriter::new();
    let mut prev: Option<(i32, i32)> = None;
    for node in nodes {
        for byte in encode_type1(node.node_id)? {
            bw.write_bits(byte as u32, 8);
        }
        let (lat, lon) = (to_ntu(node.lat_deg), to_ntu(node.lon_deg));
        let (plat, plon) = prev.unwrap_or((lat, lon));
        let dlon = ((lon as i64 - plon as i64) >> scale_shift) as i64;
        let dlat = ((lat as i64 - plat as i64) >> scale_shift) as i64;
        bw.write_type5_signed(dlon, 19);
        bw.write_type5_signed(dlat, 19);
        prev = Some((lat, lon));
    }
    let bitstream = bw.finish();

    let mut out = desc;
    out.extend_from_slice(&bitstream);
    Ok(out)
}

/// Encode the `SegmentsBlock`: byte-aligned `BlkDesc || per-segment
/// Type-1 ids + big-endian f32 length`.
pub fn encode_segments_block(segments: &[Segment]) -> SdalResult<Vec<u8>> {
    let mut out = Vec::with_capacity(6 + segments.len() * 8);
    out.extend_from_slice(&SEGMENTS_BLOCK_ID.to_be_bytes());
    out.extend_from_slice(&(segments.len() as u32).to_be_bytes());
    for seg in segments {
        out.extend_from_slice(&encode_type1(seg.seg_id)?);
        out.extend_from_slice(&encode_type1(seg.from_node_id)?);
        out.extend_from_slice(&encode_type1(seg.to_node_id)?);
        out.extend_from_slice(&seg.length_m.to_be_bytes());
    }
    Ok(out)
}

fn graph_rect(nodes: &[Node]) -> DbRect {
    if nodes.is_empty() {
        return DbRect { min_lon: 0, min_lat: 0, max_lon: 0, max_lat: 0 };
    }
    let mut min_lon = i32::MAX;
    let mut min_lat = i32::MAX;
    let mut max_lon = i32::MIN;
    let mut max_lat = i32::MIN;
    for n in nodes {
        let (lon, lat) = (to_ntu(n.lon_deg), to_ntu(n.lat_deg));
        min_lon = min_lon.min(lon);
        min_lat = min_lat.min(lat);
        max_lon = max_lon.max(lon);
        max_lat = max_lat.max(lat);
    }
    DbRect { min_lon, min_lat, max_lon, max_lat }
}

/// Encode one routing parcel's full payload: `SptlPclHdr ||
/// RoutingParcelHeader0 || BlockOffsetArray || NodesBlock || SegmentsBlock`.
///
/// `segments` should be restricted to those whose both endpoints lie in
/// `nodes` (true for a single un-partitioned graph; callers partitioning
/// via [`partition_nodes`] must filter segments accordingly).
pub fn encode_routing_parcel(nodes: &[Node], segments: &[Segment], scale_shift: u8) -> SdalResult<Vec<u8>> {
    let rect = graph_rect(nodes);
    let sptl_hdr = encode_sptl_pcl_hdr(rect, scale_shift, nodes.len() as u32, segments.len() as u32);
    let hdr0 = encode_routing_hdr0(nodes.len() as u32, segments.len() as u32);
    let nodes_block = encode_nodes_block(nodes, scale_shift)?;
    let segs_block = encode_segments_block(segments)?;
    let block_offsets = encode_block_offset_array(nodes_block.len() as u32);

    let mut out = Vec::with_capacity(
        sptl_hdr.len() + hdr0.len() + block_offsets.len() + nodes_block.len() + segs_block.len(),
    );
    out.extend_from_slice(&sptl_hdr);
    out.extend_from_slice(&hdr0);
    out.extend_from_slice(&block_offsets);
    out.extend_from_slice(&nodes_block);
    out.extend_from_slice(&segs_block);
    Ok(out)
}

/// Partition a node list into blocks of at most [`MAX_NODES_PER_PARTITION`].
pub fn partition_nodes(nodes: &[Node]) -> Vec<&[Node]> {
    nodes.chunks(MAX_NODES_PER_PARTITION).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_graph, RoadLineString};

    #[test]
    fn encodes_small_graph_without_error() {
        let lines = vec![RoadLineString {
            speed_class: 2,
            oneway: false,
            points: vec![(2.0, 48.0), (2.001, 48.001), (2.002, 48.0)],
        }];
        let graph = build_graph(&lines);
        let shift = select_scale_shift(&graph.nodes);
        let payload = encode_routing_parcel(&graph.nodes, &graph.segments, shift).unwrap();
        assert!(payload.len() > 128 + 32 + 16);
    }

    #[test]
    fn default_scale_shift_suffices_for_small_deltas() {
        let lines = vec![RoadLineString {
            speed_class: 2,
            oneway: false,
            points: vec![(2.0, 48.0), (2.0001, 48.0001)],
        }];
        let graph = build_graph(&lines);
        assert_eq!(select_scale_shift(&graph.nodes), DEFAULT_SCALE_SHIFT);
    }

    #[test]
    fn partitions_at_one_thousand_nodes() {
        let nodes: Vec<Node> = (0..2500)
            .map(|i| Node {
                node_id: i,
                lon_deg: 0.0,
                lat_deg: 0.0,
                segment_ids: vec![],
                seg_base_index: 0,
            })
            .collect();
        let parts = partition_nodes(&nodes);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), MAX_NODES_PER_PARTITION);
        assert_eq!(parts[2].len(), 500);
    }

    #[test]
    fn nodes_block_round_trips_ids_and_anchor() {
        let lines = vec![RoadLineString {
            speed_class: 1,
            oneway: false,
            points: vec![(10.0, 50.0), (10.001, 50.001), (10.002, 50.0)],
        }];
        let graph = build_graph(&lines);
        let block = encode_nodes_block(&graph.nodes, DEFAULT_SCALE_SHIFT).unwrap();
        let block_id = u16::from_be_bytes([block[0], block[1]]);
        let entry_count = u32::from_be_bytes(block[2..6].try_into().unwrap());
        assert_eq!(block_id, NODES_BLOCK_ID);
        assert_eq!(entry_count, graph.nodes.len() as u32);
    }
}
