//! POI-index parcel: identical on-disc layout to the B-tree
//! offset parcel, keyed by POI index instead of way-id.

use sdal_spatial::serialize_btree_payload;

/// Encode the POIINDEX.SDL payload from `(poi_index, byte_offset)` pairs,
/// already in key order.
pub fn encode_poi_index(pairs: &[(u32, u64)]) -> Vec<u8> {
    serialize_btree_payload(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_btree_layout() {
        let pairs = vec![(0u32, 0u64), (1, 20)];
        let payload = encode_poi_index(&pairs);
        assert_eq!(payload.len(), 6 + 2 * 12);
    }
}
