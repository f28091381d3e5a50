//! The 20-byte `PclHdr` parcel container and composite `ParcelID`.
//!
//! Every on-disc unit in SDAL — a strings chunk, a cartography chunk, a
//! routing block — is wrapped in the same 20-byte header before it lands in
//! a region file or a global index file.

use crate::error::{SdalError, SdalResult};

pub const HEADER_LEN: usize = 20;
pub const MAX_COMPRESSED_PAYLOAD: usize = 65_000;

/// Decoded fields of the 32-bit composite `ParcelID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParcelId {
    pub offset_units: u32,
    pub size_index: u8,
    pub redundancy: bool,
    pub external: bool,
}

/// Split a 32-bit `ParcelID` into its bitfields: bits 0-23 offset_units,
/// 24-29 size_index, 30 redundancy, 31 external-to-region.
pub fn decode_parcel_id(raw: u32) -> ParcelId {
    ParcelId {
        offset_units: raw & 0x00FF_FFFF,
        size_index: ((raw >> 24) & 0x3F) as u8,
        redundancy: (raw >> 30) & 1 == 1,
        external: (raw >> 31) & 1 == 1,
    }
}

/// Pack a `ParcelID` from its bitfields.
pub fn make_parcel_id(offset_units: u32, size_index: u8, redundancy: bool, external: bool) -> u32 {
    (offset_units & 0x00FF_FFFF)
        | (((size_index & 0x3F) as u32) << 24)
        | ((redundancy as u32) << 30)
        | ((external as u32) << 31)
}

/// Parameters for [`encode_parcel`] beyond the id and payload itself.
#[derive(Debug, Clone, Copy)]
pub struct ParcelMeta {
    pub region: u8,
    pub desc: u16,
    pub ptype: u8,
    pub compress_type: u16,
    pub offset_units: u32,
    pub size_index: u8,
    pub redundancy: bool,
    pub external: bool,
}

/// Encode a parcel: a 20-byte big-endian `PclHdr` followed by `payload`.
///
/// If `pid` is `Some`, it is used verbatim; if `None`, the ParcelID is
/// synthesized from `meta`'s offset/size/flag fields. Fails with
/// [`SdalError::ParcelTooLarge`] if `payload` exceeds the 65,000-byte
/// implementation ceiling — callers must chunk their input instead.
pub fn encode_parcel(pid: Option<u32>, payload: &[u8], meta: ParcelMeta) -> SdalResult<Vec<u8>> {
    if payload.len() > MAX_COMPRESSED_PAYLOAD {
        return Err(SdalError::ParcelTooLarge { size: payload.len() });
    }

    let parcelid = pid.unwrap_or_else(|| {
        make_parcel_id(meta.offset_units, meta.size_index, meta.redundancy, meta.external)
    });

    // Resolved open question: populate the compressed-size field in bits
    // for every parcel, not only compressed ones, so a reader trusting
    // this field never sees a spurious 0-length claim.
    let size_bits = (payload.len() as u64) * 8;
    let cmp_size_hi = ((size_bits >> 16) & 0xFF) as u8;
    let cmp_size_lo = (size_bits & 0xFFFF) as u16;
    let uncomp_size_sat = ((HEADER_LEN + payload.len()).min(0xFFFF)) as u16;

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&parcelid.to_be_bytes());
    out.extend_from_slice(&meta.desc.to_be_bytes());
    out.push(meta.ptype);
    out.push(meta.region);
    out.push(0); // endian_swap, always big-endian
    out.push(cmp_size_hi);
    out.extend_from_slice(&cmp_size_lo.to_be_bytes());
    out.extend_from_slice(&meta.compress_type.to_be_bytes());
    out.extend_from_slice(&(HEADER_LEN as u16).to_be_bytes()); // data_offset
    out.extend_from_slice(&uncomp_size_sat.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // extension_offset
    out.extend_from_slice(payload);

    debug_assert_eq!(out.len() - HEADER_LEN, payload.len());
    Ok(out)
}

/// Raw, fully-parsed view of a parcel header (for test harnesses / readers).
#[derive(Debug, Clone, Copy)]
pub struct PclHdr {
    pub parcelid: u32,
    pub desc: u16,
    pub ptype: u8,
    pub region: u8,
    pub cmp_size_bits: u32,
    pub compress_type: u16,
    pub data_offset: u16,
    pub uncomp_size_sat: u16,
}

pub fn decode_header(buf: &[u8]) -> SdalResult<PclHdr> {
    if buf.len() < HEADER_LEN {
        return Err(SdalError::InputNotAvailable("truncated PclHdr".into()));
    }
    let parcelid = u32::from_be_bytes(buf[0..4].try_into().unwrap());
    let desc = u16::from_be_bytes(buf[4..6].try_into().unwrap());
    let ptype = buf[6];
    let region = buf[7];
    let cmp_hi = buf[9] as u32;
    let cmp_lo = u16::from_be_bytes(buf[10..12].try_into().unwrap()) as u32;
    let compress_type = u16::from_be_bytes(buf[12..14].try_into().unwrap());
    let data_offset = u16::from_be_bytes(buf[14..16].try_into().unwrap());
    let uncomp_size_sat = u16::from_be_bytes(buf[16..18].try_into().unwrap());
    Ok(PclHdr {
        parcelid,
        desc,
        ptype,
        region,
        cmp_size_bits: (cmp_hi << 16) | cmp_lo,
        compress_type,
        data_offset,
        uncomp_size_sat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ParcelMeta {
        ParcelMeta {
            region: 3,
            desc: 0x1234,
            ptype: 7,
            compress_type: 0,
            offset_units: 0,
            size_index: 0,
            redundancy: false,
            external: false,
        }
    }

    #[test]
    fn header_is_twenty_bytes_and_round_trips_fields() {
        let payload = b"hello sdal";
        let encoded = encode_parcel(Some(0xDEAD_BEEF), payload, meta()).unwrap();
        assert_eq!(encoded.len(), HEADER_LEN + payload.len());

        let hdr = decode_header(&encoded).unwrap();
        assert_eq!(hdr.parcelid, 0xDEAD_BEEF);
        assert_eq!(hdr.desc, 0x1234);
        assert_eq!(hdr.ptype, 7);
        assert_eq!(hdr.region, 3);
        assert_eq!(hdr.data_offset, 20);
        assert_eq!(hdr.uncomp_size_sat, (20 + payload.len()) as u16);
        assert_eq!(hdr.cmp_size_bits, (payload.len() as u32) * 8);
    }

    #[test]
    fn parcel_id_bitfields_round_trip() {
        let pid = make_parcel_id(0x00AB_CDEF, 5, true, false);
        let decoded = decode_parcel_id(pid);
        assert_eq!(decoded.offset_units, 0x00AB_CDEF);
        assert_eq!(decoded.size_index, 5);
        assert!(decoded.redundancy);
        assert!(!decoded.external);
    }

    #[test]
    fn synthesized_pid_used_when_none_given() {
        let m = ParcelMeta {
            offset_units: 7,
            size_index: 2,
            redundancy: false,
            external: true,
            ..meta()
        };
        let encoded = encode_parcel(None, b"x", m).unwrap();
        let hdr = decode_header(&encoded).unwrap();
        let decoded = decode_parcel_id(hdr.parcelid);
        assert_eq!(decoded.offset_units, 7);
        assert_eq!(decoded.size_index, 2);
        assert!(decoded.external);
    }

    #[test]
    fn oversized_payload_rejected() {
        let payload = vec![0u8; MAX_COMPRESSED_PAYLOAD + 1];
        let err = encode_parcel(Some(0), &payload, meta()).unwrap_err();
        assert!(matches!(err, SdalError::ParcelTooLarge { .. }));
    }

    #[test]
    fn uncomp_size_saturates_at_u16_max() {
        let payload = vec![0u8; 65_000];
        let encoded = encode_parcel(Some(0), &payload, meta()).unwrap();
        let hdr = decode_header(&encoded).unwrap();
        assert_eq!(hdr.uncomp_size_sat, 0xFFFF);
    }

    // An empty payload still yields exactly a 20-byte parcel.
    #[test]
    fn empty_payload_yields_bare_header() {
        let encoded = encode_parcel(Some(0), &[], meta()).unwrap();
        assert_eq!(encoded.len(), HEADER_LEN);
    }
}
