//! Region-file assembler: lays out a region's parcels in
//! order, pads each to a 4096-byte unit, and records a topology entry per
//! parcel into the shared topology ledger.

use sdal_payloads::CartographyRecord;
use sdal_routing::{encode_routing_parcel, Node, Segment};
use sdal_spatial::serialize_btree_payload;
use sdal_types::{encode_parcel, ParcelMeta, SdalError, SdalResult};

pub const UNIT_SIZE: usize = 4096;
pub const RGN_HDR_LEN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    Standard,
    Oem,
}

/// Per-parcel record captured while assembling a region file.
#[derive(Debug, Clone)]
pub struct TopologyEntry {
    pub db_id: u32,
    pub file_name: String,
    pub parcel_id: u32,
    pub offset_units: u32,
    pub rect: (i32, i32, i32, i32), // min_lon, min_lat, max_lon, max_lat
    pub scale_min: u16,
    pub scale_max: u16,
    pub layer_type: u16,
}

/// Each variant already carries the chunk of data to encode — chunking
/// across the 65,000-byte ceiling is the payload encoder's job, done
/// before a `ParcelBuilder` is constructed.
#[derive(Debug, Clone)]
pub enum ParcelPayload {
    Carto(Vec<CartographyRecord>),
    BTree(Vec<(u32, u64)>),
    Routing { nodes: Vec<Node>, segments: Vec<Segment>, scale_shift: u8 },
    Raw(Vec<u8>),
}

impl ParcelPayload {
    fn build(&self) -> SdalResult<Vec<u8>> {
        match self {
            // One builder produces exactly one parcel, so the caller must
            // already have split `records` to at most `CHUNK_SIZE` — one
            // `ParcelBuilder` per chunk, same as the KD-tree and density
            // payloads do at the call site.
            ParcelPayload::Carto(records) => {
                let mut chunks = sdal_payloads::encode_cartography_chunked(records);
                match chunks.len() {
                    0 | 1 => Ok(chunks.pop().unwrap_or_default()),
                    n => Err(SdalError::CodecError(format!(
                        "cartography payload split into {n} chunks; caller must emit one ParcelBuilder per chunk"
                    ))),
                }
            }
            ParcelPayload::BTree(pairs) => Ok(serialize_btree_payload(pairs)),
            ParcelPayload::Routing { nodes, segments, scale_shift } => {
                encode_routing_parcel(nodes, segments, *scale_shift)
            }
            ParcelPayload::Raw(bytes) => Ok(bytes.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParcelBuilder {
    pub pid: Option<u32>,
    pub desc: u16,
    pub ptype: u8,
    pub layer_type: u16,
    pub rect: (i32, i32, i32, i32),
    pub scale_min: u16,
    pub scale_max: u16,
    pub redundancy: bool,
    pub external: bool,
    pub payload: ParcelPayload,
}

fn pad_to_unit(buf: &mut Vec<u8>) {
    let rem = buf.len() % UNIT_SIZE;
    if rem != 0 {
        buf.resize(buf.len() + (UNIT_SIZE - rem), 0);
    }
}

/// Encode the 512-byte `RgnHdr` for standard-mode region files.
pub fn encode_rgn_hdr(db_id: u32, layer_parcel_sizes: &[u8; 256]) -> Vec<u8> {
    let mut out = Vec::with_capacity(RGN_HDR_LEN);
    out.extend_from_slice(&db_id.to_be_bytes());
    out.extend_from_slice(&[0u8; 12]);
    out.extend_from_slice(&1u16.to_be_bytes()); // major
    out.extend_from_slice(&7u16.to_be_bytes()); // minor
    out.extend_from_slice(&1999u16.to_be_bytes()); // year
    out.extend_from_slice(&0u16.to_be_bytes()); // reserved
    out.extend_from_slice(layer_parcel_sizes);
    out.resize(RGN_HDR_LEN, 0);
    out
}

/// Lay out one region's parcels into a file image, appending a
/// [`TopologyEntry`] per parcel to `topology` in write order.
pub fn write_region_file(
    db_id: u32,
    file_name: &str,
    region_byte: u8,
    mode: FormatMode,
    builders: &[ParcelBuilder],
    topology: &mut Vec<TopologyEntry>,
) -> SdalResult<Vec<u8>> {
    let mut file = Vec::new();

    if mode == FormatMode::Standard {
        file.extend_from_slice(&encode_rgn_hdr(db_id, &[0u8; 256]));
        pad_to_unit(&mut file);
    }

    for b in builders {
        let offset_units = (file.len() / UNIT_SIZE) as u32;
        let payload = b.payload.build()?;
        let meta = ParcelMeta {
            region: region_byte,
            desc: b.desc,
            ptype: b.ptype,
            compress_type: 0,
            offset_units,
            size_index: 0,
            redundancy: b.redundancy,
            external: b.external,
        };
        let encoded = encode_parcel(b.pid, &payload, meta)?;
        let parcel_id = u32::from_be_bytes(encoded[0..4].try_into().unwrap());

        file.extend_from_slice(&encoded);
        pad_to_unit(&mut file);

        topology.push(TopologyEntry {
            db_id,
            file_name: file_name.to_string(),
            parcel_id,
            offset_units,
            rect: b.rect,
            scale_min: b.scale_min,
            scale_max: b.scale_max,
            layer_type: b.layer_type,
        });
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(payload: ParcelPayload) -> ParcelBuilder {
        ParcelBuilder {
            pid: None,
            desc: 0,
            ptype: 1,
            layer_type: 1,
            rect: (0, 0, 1, 1),
            scale_min: 0,
            scale_max: 0,
            redundancy: false,
            external: false,
            payload,
        }
    }

    #[test]
    fn standard_mode_starts_parcels_after_padded_header() {
        let mut topo = Vec::new();
        let builders = vec![builder(ParcelPayload::Raw(b"hi".to_vec()))];
        let file = write_region_file(1, "R0001.SDL", 0, FormatMode::Standard, &builders, &mut topo).unwrap();
        assert_eq!(topo[0].offset_units, 1); // first parcel starts after the header's unit
        assert_eq!(file.len() % UNIT_SIZE, 0);
    }

    #[test]
    fn oem_mode_starts_parcels_at_offset_zero() {
        let mut topo = Vec::new();
        let builders = vec![builder(ParcelPayload::Raw(b"hi".to_vec()))];
        write_region_file(1, "R0001.SDL", 0, FormatMode::Oem, &builders, &mut topo).unwrap();
        assert_eq!(topo[0].offset_units, 0);
    }

    #[test]
    fn topology_entries_appended_in_write_order() {
        let mut topo = Vec::new();
        let builders = vec![
            builder(ParcelPayload::Raw(b"a".to_vec())),
            builder(ParcelPayload::Raw(b"bb".to_vec())),
        ];
        write_region_file(2, "R0002.SDL", 1, FormatMode::Oem, &builders, &mut topo).unwrap();
        assert_eq!(topo.len(), 2);
        assert_eq!(topo[0].offset_units, 0);
        assert_eq!(topo[1].offset_units, 1);
    }

    #[test]
    fn every_parcel_padded_to_unit_boundary() {
        let mut topo = Vec::new();
        let builders = vec![builder(ParcelPayload::Raw(vec![0xAB; 5000]))];
        let file = write_region_file(3, "R0003.SDL", 0, FormatMode::Oem, &builders, &mut topo).unwrap();
        assert_eq!(file.len() % UNIT_SIZE, 0);
    }
}
