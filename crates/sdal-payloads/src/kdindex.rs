//! KD-tree index payload for `KDTREE.SDL`.
//!
//! `IDxPclHdr || KD nodes`, chunked so only the first parcel carries the
//! header. `IDxPclHdr` is widened here to 32 bytes via a 12-byte trailing
//! reserved field (rather than the 8 bytes the itemized field list sums
//! to) — see DESIGN.md.

use sdal_spatial::{serialize_kdtree, PoiPoint};
use sdal_types::to_ntu;

pub const IDX_HDR_LEN: usize = 32;

/// Node budget per parcel after the header eats into the first chunk's share.
pub fn nodes_per_chunk() -> usize {
    (65_000 - IDX_HDR_LEN) / 12
}

fn encode_header(length: u32, min_lat_ntu: i32, min_lon_ntu: i32) -> Vec<u8> {
    let mut out = Vec::with_capacity(IDX_HDR_LEN);
    out.extend_from_slice(&1u16.to_be_bytes()); // index_id
    out.extend_from_slice(&1u16.to_be_bytes()); // index_type
    out.extend_from_slice(&0u32.to_be_bytes()); // offset
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(&min_lat_ntu.to_be_bytes());
    out.extend_from_slice(&min_lon_ntu.to_be_bytes());
    out.extend_from_slice(&[0u8; 12]); // reserved
    out
}

/// Encode the KDTREE.SDL payload(s). Returns one payload per parcel; only
/// `payloads[0]` is prefixed with `IDxPclHdr`.
///
/// `points` must already be in the tree's intended serialization order
/// (e.g. the output of [`sdal_spatial::build_kdtree`]).
pub fn encode_kdtree_index_chunked(points: &[PoiPoint]) -> Vec<Vec<u8>> {
    if points.is_empty() {
        // With no points, the sole parcel's payload is exactly the header.
        return vec![encode_header(0, 0, 0)];
    }

    let min_lat_ntu = points.iter().map(|p| to_ntu(p.lat)).min().unwrap();
    let min_lon_ntu = points.iter().map(|p| to_ntu(p.lon)).min().unwrap();

    let chunk_size = nodes_per_chunk();
    let chunks: Vec<&[PoiPoint]> = points.chunks(chunk_size).collect();
    let node_blocks: Vec<Vec<u8>> = chunks.iter().map(|c| serialize_kdtree(c)).collect();
    let total_length: u32 = node_blocks.iter().map(|b| b.len() as u32).sum();

    let mut payloads = Vec::with_capacity(node_blocks.len());
    for (i, block) in node_blocks.into_iter().enumerate() {
        if i == 0 {
            let mut p = encode_header(total_length, min_lat_ntu, min_lon_ntu);
            p.extend_from_slice(&block);
            payloads.push(p);
        } else {
            payloads.push(block);
        }
    }
    payloads
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_poi_set_yields_bare_header() {
        let payloads = encode_kdtree_index_chunked(&[]);
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].len(), IDX_HDR_LEN);
        // length field (bytes 4..8) is zero.
        assert_eq!(&payloads[0][4..8], &[0, 0, 0, 0]);
    }

    #[test]
    fn first_chunk_node_block_matches_invariant_seven() {
        let points = vec![
            PoiPoint { index: 0, lon: 2.0, lat: 48.0 },
            PoiPoint { index: 1, lon: 2.1, lat: 48.1 },
        ];
        let payloads = encode_kdtree_index_chunked(&points);
        assert_eq!(payloads.len(), 1);
        let node_block = &payloads[0][IDX_HDR_LEN..];
        assert_eq!(node_block.len(), 4 + 12 * points.len());
    }

    #[test]
    fn large_input_chunks_with_header_only_on_first() {
        let points: Vec<PoiPoint> = (0..12_000)
            .map(|i| PoiPoint { index: i, lon: i as f64 * 0.0001, lat: i as f64 * 0.0002 })
            .collect();
        let payloads = encode_kdtree_index_chunked(&points);
        assert!(payloads.len() > 1);
        assert!(payloads[0].len() > IDX_HDR_LEN);
        for p in &payloads[1..] {
            // each subsequent payload starts with its own u32 count, no header.
            assert!(p.len() < 65_000);
        }
    }
}
