//! Cartography parcel: road geometries as NTU coordinate
//! sequences with a bounding-rect header.

pub const CHUNK_SIZE: usize = 200;

/// One road's NTU-coordinate geometry, ready to encode.
#[derive(Debug, Clone)]
pub struct CartographyRecord {
    pub way_id: u32,
    /// `(lon_ntu, lat_ntu)` pairs in line-string order.
    pub coords: Vec<(i32, i32)>,
}

/// Split `records` into chunks of at most [`CHUNK_SIZE`] and encode each
/// chunk's payload, each with its own bounding rect.
pub fn encode_cartography_chunked(records: &[CartographyRecord]) -> Vec<Vec<u8>> {
    records
        .chunks(CHUNK_SIZE)
        .map(encode_cartography_chunk)
        .collect()
}

fn encode_cartography_chunk(records: &[CartographyRecord]) -> Vec<u8> {
    let (min_lon, min_lat, max_lon, max_lat) = bounding_rect(records);

    let mut out = Vec::new();
    out.extend_from_slice(&min_lon.to_be_bytes());
    out.extend_from_slice(&min_lat.to_be_bytes());
    out.extend_from_slice(&max_lon.to_be_bytes());
    out.extend_from_slice(&max_lat.to_be_bytes());
    out.extend_from_slice(&(records.len() as u16).to_be_bytes());

    for rec in records {
        out.extend_from_slice(&rec.way_id.to_be_bytes());
        out.extend_from_slice(&(rec.coords.len() as u16).to_be_bytes());
        for &(lon, lat) in &rec.coords {
            out.extend_from_slice(&lon.to_be_bytes());
            out.extend_from_slice(&lat.to_be_bytes());
        }
    }
    out
}

fn bounding_rect(records: &[CartographyRecord]) -> (i32, i32, i32, i32) {
    let mut min_lon = i32::MAX;
    let mut min_lat = i32::MAX;
    let mut max_lon = i32::MIN;
    let mut max_lat = i32::MIN;
    for rec in records {
        for &(lon, lat) in &rec.coords {
            min_lon = min_lon.min(lon);
            min_lat = min_lat.min(lat);
            max_lon = max_lon.max(lon);
            max_lat = max_lat.max(lat);
        }
    }
    if records.is_empty() || records.iter().all(|r| r.coords.is_empty()) {
        (0, 0, 0, 0)
    } else {
        (min_lon, min_lat, max_lon, max_lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdal_types::to_ntu;

    #[test]
    fn single_road_two_vertices_matches_worked_example() {
        let coords = vec![
            (to_ntu(2.0), to_ntu(48.0)),
            (to_ntu(2.0001), to_ntu(48.0001)),
        ];
        let records = vec![CartographyRecord { way_id: 42, coords }];
        let chunks = encode_cartography_chunked(&records);
        assert_eq!(chunks.len(), 1);
        let payload = &chunks[0];

        let mut expected = Vec::new();
        expected.extend_from_slice(&200_000i32.to_be_bytes());
        expected.extend_from_slice(&4_800_000i32.to_be_bytes());
        expected.extend_from_slice(&200_010i32.to_be_bytes());
        expected.extend_from_slice(&4_800_010i32.to_be_bytes());
        expected.extend_from_slice(&1u16.to_be_bytes());
        expected.extend_from_slice(&42u32.to_be_bytes());
        expected.extend_from_slice(&2u16.to_be_bytes());
        expected.extend_from_slice(&200_000i32.to_be_bytes());
        expected.extend_from_slice(&4_800_000i32.to_be_bytes());
        expected.extend_from_slice(&200_010i32.to_be_bytes());
        expected.extend_from_slice(&4_800_010i32.to_be_bytes());

        assert_eq!(payload, &expected);
    }

    #[test]
    fn chunks_at_two_hundred_records() {
        let records: Vec<CartographyRecord> = (0..450)
            .map(|i| CartographyRecord {
                way_id: i,
                coords: vec![(0, 0), (1, 1)],
            })
            .collect();
        let chunks = encode_cartography_chunked(&records);
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(encode_cartography_chunked(&[]).is_empty());
    }
}
