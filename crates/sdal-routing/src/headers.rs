//! The fixed-layout headers preceding a routing parcel's node/segment
//! blocks: `SptlPclHdr` (128 bytes), `RoutingParcelHeader0`
//! (32 bytes), and `BlockOffsetArray` (16 bytes).

#[derive(Debug, Clone, Copy)]
pub struct DbRect {
    pub min_lon: i32,
    pub min_lat: i32,
    pub max_lon: i32,
    pub max_lat: i32,
}

impl DbRect {
    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.min_lon.to_be_bytes());
        out.extend_from_slice(&self.min_lat.to_be_bytes());
        out.extend_from_slice(&self.max_lon.to_be_bytes());
        out.extend_from_slice(&self.max_lat.to_be_bytes());
    }
}

pub const SPTL_HDR_LEN: usize = 128;
pub const ROUTING_HDR0_LEN: usize = 32;
pub const BLOCK_OFFSET_ARRAY_LEN: usize = 16;

/// Encode `SptlPclHdr`: bounding/tile/ancestor rects (all equal for a
/// single region), a zeroed 20-byte cross-reference header, sixteen
/// zeroed KD/B-tree offset slots, then scale/layer/counts, padded to 128.
pub fn encode_sptl_pcl_hdr(rect: DbRect, scale_shift: u8, node_count: u32, seg_count: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(SPTL_HDR_LEN);
    rect.write(&mut out); // bounding
    rect.write(&mut out); // tile
    rect.write(&mut out); // ancestor
    out.extend_from_slice(&[0u8; 20]); // cross-reference header
    out.extend_from_slice(&[0u8; 32]); // 16 x u16 KD/B-tree offset slots
    out.push(scale_shift);
    out.push(1); // layer
    out.extend_from_slice(&0u16.to_be_bytes()); // reserved
    out.extend_from_slice(&node_count.to_be_bytes());
    out.extend_from_slice(&seg_count.to_be_bytes());
    out.extend_from_slice(&[0u8; 16]); // padding
    debug_assert_eq!(out.len(), SPTL_HDR_LEN);
    out
}

/// Encode `RoutingParcelHeader0`.
pub fn encode_routing_hdr0(total_nodes: u32, total_segs: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(ROUTING_HDR0_LEN);
    out.extend_from_slice(&0xFFFFu16.to_be_bytes()); // max_arm_to_arm
    out.extend_from_slice(&total_segs.to_be_bytes());
    out.push(0xFF); // max_segs_per_node
    out.push(0); // flags
    out.extend_from_slice(&total_nodes.to_be_bytes());
    out.extend_from_slice(&0xFFFFu16.to_be_bytes()); // max_nodes
    out.extend_from_slice(&0xFFFFu16.to_be_bytes()); // max_segs
    out.extend_from_slice(&1u16.to_be_bytes()); // max_tile_layers
    out.extend_from_slice(&[0u8; 4]); // reserved
    out.extend_from_slice(&0xFFFFu16.to_be_bytes()); // max_coord_delta_x
    out.extend_from_slice(&0xFFFFu16.to_be_bytes()); // max_coord_delta_y
    out.extend_from_slice(&[0u8; 6]); // padding to 32
    debug_assert_eq!(out.len(), ROUTING_HDR0_LEN);
    out
}

/// Encode `BlockOffsetArray`: offsets are relative to this array's own
/// start, so `node_block_offset` is always `BLOCK_OFFSET_ARRAY_LEN`.
pub fn encode_block_offset_array(node_block_len: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(BLOCK_OFFSET_ARRAY_LEN);
    let node_offset = BLOCK_OFFSET_ARRAY_LEN as u32;
    let seg_offset = node_offset + node_block_len;
    out.extend_from_slice(&node_offset.to_be_bytes());
    out.extend_from_slice(&seg_offset.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes()); // conditions
    out.extend_from_slice(&0u32.to_be_bytes()); // reserved
    debug_assert_eq!(out.len(), BLOCK_OFFSET_ARRAY_LEN);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sptl_hdr_is_128_bytes() {
        let rect = DbRect { min_lon: 0, min_lat: 0, max_lon: 1, max_lat: 1 };
        assert_eq!(encode_sptl_pcl_hdr(rect, 12, 10, 5).len(), SPTL_HDR_LEN);
    }

    #[test]
    fn routing_hdr0_is_32_bytes() {
        assert_eq!(encode_routing_hdr0(10, 5).len(), ROUTING_HDR0_LEN);
    }

    #[test]
    fn block_offset_array_offsets_are_relative_to_its_own_start() {
        let arr = encode_block_offset_array(100);
        let node_offset = u32::from_be_bytes(arr[0..4].try_into().unwrap());
        let seg_offset = u32::from_be_bytes(arr[4..8].try_into().unwrap());
        assert_eq!(node_offset, BLOCK_OFFSET_ARRAY_LEN as u32);
        assert_eq!(seg_offset, BLOCK_OFFSET_ARRAY_LEN as u32 + 100);
    }
}
