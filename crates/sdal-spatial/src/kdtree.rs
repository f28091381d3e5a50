//! KD-tree build and flat serialization over POI `(lon, lat)` points
//!. Structure is implicit in point order: a balanced-median
//! split on alternating axes, emitted in pre-order, lets a reader rebuild
//! or range-scan without an explicit index.

/// A POI point carrying its global dense index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoiPoint {
    pub index: u32,
    pub lon: f64,
    pub lat: f64,
}

/// Recursively split `points` on alternating axes (lon, then lat, ...),
/// picking the median at each level and writing it before its two
/// children — a standard pre-order balanced KD-tree layout.
pub fn build_kdtree(mut points: Vec<PoiPoint>) -> Vec<PoiPoint> {
    let mut out = Vec::with_capacity(points.len());
    build_recursive(&mut points, 0, &mut out);
    out
}

fn build_recursive(points: &mut [PoiPoint], axis: u8, out: &mut Vec<PoiPoint>) {
    if points.is_empty() {
        return;
    }
    if points.len() == 1 {
        out.push(points[0]);
        return;
    }

    if axis == 0 {
        points.sort_by(|a, b| a.lon.partial_cmp(&b.lon).unwrap());
    } else {
        points.sort_by(|a, b| a.lat.partial_cmp(&b.lat).unwrap());
    }

    let mid = points.len() / 2;
    out.push(points[mid]);

    let next_axis = 1 - axis;
    let (left, right_with_median) = points.split_at_mut(mid);
    let right = &mut right_with_median[1..];
    build_recursive(left, next_axis, out);
    build_recursive(right, next_axis, out);
}

/// Serialize a KD node block: `u32 poi_count || poi_count ×
/// (u32 index, i32 lon_e6, i32 lat_e6)`, big-endian throughout.
pub fn serialize_kdtree(points: &[PoiPoint]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + points.len() * 12);
    out.extend_from_slice(&(points.len() as u32).to_be_bytes());
    for p in points {
        let lon_e6 = (p.lon * 1_000_000.0).round() as i32;
        let lat_e6 = (p.lat * 1_000_000.0).round() as i32;
        out.extend_from_slice(&p.index.to_be_bytes());
        out.extend_from_slice(&lon_e6.to_be_bytes());
        out.extend_from_slice(&lat_e6.to_be_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_tree_and_header_only_payload() {
        let tree = build_kdtree(Vec::new());
        assert!(tree.is_empty());
        let payload = serialize_kdtree(&tree);
        assert_eq!(payload, 0u32.to_be_bytes().to_vec());
    }

    #[test]
    fn preserves_all_points() {
        let points = vec![
            PoiPoint { index: 0, lon: 2.0, lat: 48.0 },
            PoiPoint { index: 1, lon: 2.1, lat: 48.1 },
            PoiPoint { index: 2, lon: 1.9, lat: 47.9 },
            PoiPoint { index: 3, lon: 2.05, lat: 48.05 },
        ];
        let tree = build_kdtree(points.clone());
        assert_eq!(tree.len(), points.len());
        let mut indices: Vec<u32> = tree.iter().map(|p| p.index).collect();
        indices.sort();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    // Payload after the header is exactly 4 + 12*count bytes.
    #[test]
    fn serialized_size_matches_invariant() {
        let points: Vec<PoiPoint> = (0..10)
            .map(|i| PoiPoint { index: i, lon: i as f64 * 0.1, lat: i as f64 * 0.2 })
            .collect();
        let tree = build_kdtree(points);
        let payload = serialize_kdtree(&tree);
        assert_eq!(payload.len(), 4 + 12 * tree.len());
    }
}
