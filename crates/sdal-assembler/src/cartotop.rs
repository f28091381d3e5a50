//! `CARTOTOP.SDL`: the global topology index over every
//! spatial parcel emitted across all regions.

use crate::region::TopologyEntry;

/// Well-known parcel id for the single CARTOTOP parcel. The source gives
/// this a symbolic name rather than a numeric constant; this value is a
/// build-time choice (see DESIGN.md).
pub const PID_CARTOTOP: u32 = 1;

/// Build the CARTOTOP payload from the accumulated topology vector, read
/// once after all regions are emitted.
pub fn encode_cartotop(topology: &[TopologyEntry]) -> Vec<u8> {
    let (min_lon, min_lat, max_lon, max_lat) = mbr(topology);

    let mut out = Vec::new();
    out.extend_from_slice(&min_lon.to_be_bytes());
    out.extend_from_slice(&min_lat.to_be_bytes());
    out.extend_from_slice(&max_lon.to_be_bytes());
    out.extend_from_slice(&max_lat.to_be_bytes());
    out.extend_from_slice(&(topology.len() as u16).to_be_bytes());

    for entry in topology {
        let (lon0, lat0, lon1, lat1) = entry.rect;
        out.extend_from_slice(&lon0.to_be_bytes());
        out.extend_from_slice(&lat0.to_be_bytes());
        out.extend_from_slice(&lon1.to_be_bytes());
        out.extend_from_slice(&lat1.to_be_bytes());
        out.extend_from_slice(&(entry.db_id as u16).to_be_bytes());
        out.extend_from_slice(&((entry.parcel_id & 0xFFFF) as u16).to_be_bytes());
        out.extend_from_slice(&entry.layer_type.to_be_bytes());
        out.extend_from_slice(&entry.scale_min.to_be_bytes());
        out.extend_from_slice(&entry.scale_max.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes()); // reserved
    }
    out
}

fn mbr(topology: &[TopologyEntry]) -> (i32, i32, i32, i32) {
    if topology.is_empty() {
        return (0, 0, 0, 0);
    }
    let mut min_lon = i32::MAX;
    let mut min_lat = i32::MAX;
    let mut max_lon = i32::MIN;
    let mut max_lat = i32::MIN;
    for e in topology {
        let (lon0, lat0, lon1, lat1) = e.rect;
        min_lon = min_lon.min(lon0);
        min_lat = min_lat.min(lat0);
        max_lon = max_lon.max(lon1);
        max_lat = max_lat.max(lat1);
    }
    (min_lon, min_lat, max_lon, max_lat)
}
