//! Global indexes built once across every region: the combined KD-tree
//! (`KDTREE.SDL`), the combined POI name table (`POINAMES.SDL`), POI
//! geometry plus its trailing offset index (`POIGEOM.SDL`), and the
//! disc-code density pair (`DENS{code}0.SDL`/`DENS{code}1.SDL`).

use sdal_payloads::{
    encode_density_header, encode_density_tiles, encode_kdtree_index_chunked, encode_poi_index,
    encode_strings_chunked, RegionDensityInput,
};
use sdal_spatial::PoiPoint;
use sdal_types::{encode_parcel, to_ntu, ParcelMeta, SdalResult};

fn meta(desc: u16) -> ParcelMeta {
    ParcelMeta {
        region: 0,
        desc,
        ptype: 0,
        compress_type: 0,
        offset_units: 0,
        size_index: 0,
        redundancy: false,
        external: false,
    }
}

/// `KDTREE.SDL`: the KD-tree spatial index over the full, cross-region POI
/// set, chunked the same way a region's embedded KD-tree payload is.
pub fn encode_kdtree_sdl(points: &[PoiPoint]) -> SdalResult<Vec<u8>> {
    let mut file = Vec::new();
    for chunk in encode_kdtree_index_chunked(points) {
        file.extend_from_slice(&encode_parcel(None, &chunk, meta(1))?);
    }
    Ok(file)
}

/// `POINAMES.SDL`: the global POI name table. An empty POI set still
/// yields exactly one bare (empty-payload) parcel, never zero parcels.
pub fn encode_poinames_sdl(names: &[String]) -> SdalResult<Vec<u8>> {
    let chunks = encode_strings_chunked(names);
    if chunks.is_empty() {
        return Ok(encode_parcel(None, &[], meta(0))?);
    }
    let mut file = Vec::new();
    for chunk in chunks {
        file.extend_from_slice(&encode_parcel(None, &chunk, meta(0))?);
    }
    Ok(file)
}

/// `POIGEOM.SDL`: one parcel per POI (`i32 lat_ntu, i32 lon_ntu`, in
/// global index order) followed by a trailing parcel holding the
/// index-to-byte-offset table. An empty POI set yields an empty file —
/// no parcels at all.
pub fn encode_poigeom_sdl(points: &[PoiPoint]) -> SdalResult<Vec<u8>> {
    let mut file = Vec::new();
    if points.is_empty() {
        return Ok(file);
    }

    let mut offsets = Vec::with_capacity(points.len());
    for p in points {
        offsets.push((p.index, file.len() as u64));
        let mut payload = Vec::with_capacity(8);
        payload.extend_from_slice(&to_ntu(p.lat).to_be_bytes());
        payload.extend_from_slice(&to_ntu(p.lon).to_be_bytes());
        file.extend_from_slice(&encode_parcel(None, &payload, meta(2))?);
    }
    file.extend_from_slice(&encode_parcel(None, &encode_poi_index(&offsets), meta(3))?);
    Ok(file)
}

/// Map a region's continent to its disc code, falling back to the
/// continent name's first two letters, uppercased.
pub fn disc_code_for_continent(continent: &str) -> String {
    let lower = continent.to_ascii_lowercase();
    let known = match lower.as_str() {
        "europe" => Some("EU"),
        "north-america" | "north_america" => Some("NA"),
        "south-america" | "south_america" => Some("SA"),
        "central-america" | "central_america" => Some("CA"),
        "africa" => Some("AF"),
        "asia" => Some("AS"),
        "australia-oceania" | "australia_oceania" | "oceania" => Some("AU"),
        _ => None,
    };
    known.map(str::to_string).unwrap_or_else(|| {
        let mut code: String = continent.chars().take(2).collect();
        code.make_ascii_uppercase();
        code
    })
}

/// `DENS{code}0.SDL`: a single parcel whose payload is the big-endian
/// tile count across every region grouped onto this disc code.
pub fn encode_dens_header_sdl(tile_count: u32) -> SdalResult<Vec<u8>> {
    encode_parcel(None, &encode_density_header(tile_count), meta(5))
}

/// `DENS{code}1.SDL`: the raw, concatenated tile bytes for every region
/// grouped onto this disc code, in input order.
pub fn encode_dens_body_sdl(regions: &[RegionDensityInput]) -> Vec<u8> {
    encode_density_tiles(regions).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_poi_set_still_yields_one_poinames_parcel() {
        let file = encode_poinames_sdl(&[]).unwrap();
        assert_eq!(file.len(), sdal_types::HEADER_LEN);
    }

    #[test]
    fn poinames_carries_every_name_across_chunks() {
        let names: Vec<String> = (0..2500).map(|i| format!("poi-{i}")).collect();
        let file = encode_poinames_sdl(&names).unwrap();
        assert!(file.len() > sdal_types::HEADER_LEN);
    }

    #[test]
    fn empty_poi_set_yields_empty_poigeom_file() {
        let file = encode_poigeom_sdl(&[]).unwrap();
        assert!(file.is_empty());
    }

    #[test]
    fn poigeom_carries_one_parcel_per_poi_plus_trailing_index() {
        let points = vec![
            PoiPoint { index: 0, lon: 2.0, lat: 48.0 },
            PoiPoint { index: 1, lon: 2.1, lat: 48.1 },
        ];
        let file = encode_poigeom_sdl(&points).unwrap();
        // Two geometry parcels (20 + 8 bytes each) plus one index parcel.
        let geom_bytes = 2 * (sdal_types::HEADER_LEN + 8);
        assert!(file.len() > geom_bytes);
    }

    #[test]
    fn empty_poi_set_yields_kdtree_header_only() {
        let file = encode_kdtree_sdl(&[]).unwrap();
        assert_eq!(file.len(), sdal_types::HEADER_LEN + 32);
    }

    #[test]
    fn known_continent_maps_to_its_code() {
        assert_eq!(disc_code_for_continent("europe"), "EU");
        assert_eq!(disc_code_for_continent("Europe"), "EU");
    }

    #[test]
    fn unknown_continent_falls_back_to_first_two_letters() {
        assert_eq!(disc_code_for_continent("Antarctica"), "AN");
    }

    #[test]
    fn dens_header_payload_round_trips_tile_count() {
        let parcel = encode_dens_header_sdl(42).unwrap();
        let payload = &parcel[sdal_types::HEADER_LEN..];
        assert_eq!(u32::from_be_bytes(payload.try_into().unwrap()), 42);
    }
}
